// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub type OrchResult<T, E = OrchError> = Result<T, E>;

#[derive(Debug)]
pub enum OrchError {
    Init { dbg: String },
    TaskDefinition { dbg: String },
    Ecs { dbg: String },
    // A failure entry reported by ECS alongside an otherwise successful response.
    Failure { arn: String, reason: String },
    WaitTimeout { dbg: String },
    // Reasons collected from every container which exited non-zero.
    TaskFailed { reasons: Vec<String> },
}

impl std::fmt::Display for OrchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchError::Init { dbg } => write!(f, "{}", dbg),
            OrchError::TaskDefinition { dbg } => write!(f, "{}", dbg),
            OrchError::Ecs { dbg } => write!(f, "{}", dbg),
            OrchError::Failure { arn, reason } => write!(f, "{} is {}", arn, reason),
            OrchError::WaitTimeout { dbg } => write!(f, "{}", dbg),
            OrchError::TaskFailed { reasons } => write!(f, "{}", reasons.join("\n")),
        }
    }
}

impl std::error::Error for OrchError {}

impl From<aws_sdk_ecs::error::BuildError> for OrchError {
    fn from(err: aws_sdk_ecs::error::BuildError) -> Self {
        OrchError::TaskDefinition {
            dbg: format!("Invalid task definition. {err}"),
        }
    }
}
