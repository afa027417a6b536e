// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::orchestrator::OrchError;

// Format a failure as a GitHub Actions `error` workflow command so the runner
// marks the step as failed with the message.
//
// https://docs.github.com/en/actions/using-workflows/workflow-commands-for-github-actions
pub fn workflow_error(err: &OrchError) -> String {
    format!("::error::{}", escape_data(&err.to_string()))
}

fn escape_data(msg: &str) -> String {
    msg.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
