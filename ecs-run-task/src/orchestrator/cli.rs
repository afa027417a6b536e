// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ecs_utils::WaitPolicy,
    orchestrator::{OrchError, OrchResult, STATE},
};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Register a task definition and run it with the launch type and network
/// configuration of an existing ECS service.
///
/// Every input can also be supplied through the environment variables set by
/// a GitHub Actions runner.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Name of the ECS cluster
    #[arg(long, env = "INPUT_CLUSTER")]
    cluster: String,

    /// Name of the service whose launch type and network configuration the
    /// task inherits
    #[arg(long, env = "INPUT_SERVICE")]
    service: String,

    /// Number of tasks to launch
    #[arg(long, env = "INPUT_COUNT")]
    count: i32,

    /// Path to the task definition file (YAML or JSON)
    #[arg(long, env = "INPUT_TASK-DEFINITION")]
    task_definition: PathBuf,

    /// Wait for the tasks to stop when set to `true` (case-insensitive).
    /// Anything else, including leaving it out, skips the wait
    #[arg(long, env = "INPUT_WAIT-FOR-FINISH")]
    wait_for_finish: Option<String>,

    /// How long to wait for the tasks to stop. An empty value means the
    /// default
    #[arg(
        long,
        env = "INPUT_WAIT-FOR-MINUTES",
        default_value_t = STATE.default_wait_minutes,
        value_parser = parse_wait_minutes
    )]
    wait_for_minutes: u64,

    /// Base directory for a relative task definition path
    #[arg(long, env = "GITHUB_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// AWS region override. Without it the AWS config chain decides, which
    /// already reads `AWS_REGION`
    #[arg(long)]
    region: Option<String>,
}

impl Cli {
    pub fn region(&self) -> Option<String> {
        self.region.clone()
    }

    // Resolve the user input into the configuration for a single run.
    pub fn check_requirements(self) -> OrchResult<OrchestratorConfig> {
        let workspace = match self.workspace {
            Some(workspace) => workspace,
            None => std::env::current_dir().map_err(|err| OrchError::Init {
                dbg: format!("Failed to resolve the workspace directory. {err}"),
            })?,
        };
        let task_definition_path = resolve_task_definition_path(&self.task_definition, &workspace);

        let config = OrchestratorConfig {
            cluster: self.cluster,
            service: self.service,
            count: self.count,
            task_definition_path,
            wait_for_finish: self.wait_for_finish.as_deref().is_some_and(wait_requested),
            wait_for_minutes: self.wait_for_minutes,
        };
        debug!("{:?}", config);

        Ok(config)
    }
}

#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    pub cluster: String,
    pub service: String,
    pub count: i32,
    pub task_definition_path: PathBuf,
    pub wait_for_finish: bool,
    pub wait_for_minutes: u64,
}

impl OrchestratorConfig {
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::from_minutes(self.wait_for_minutes)
    }
}

fn resolve_task_definition_path(task_definition: &Path, workspace: &Path) -> PathBuf {
    if task_definition.is_absolute() {
        task_definition.to_path_buf()
    } else {
        workspace.join(task_definition)
    }
}

// Only a case-insensitive `true` enables waiting; anything else skips it.
fn wait_requested(wait_for_finish: &str) -> bool {
    wait_for_finish.eq_ignore_ascii_case(STATE.wait_enabled_value)
}

// Actions runners export unset inputs as empty strings.
fn parse_wait_minutes(value: &str) -> Result<u64, String> {
    if value.trim().is_empty() {
        return Ok(STATE.default_wait_minutes);
    }
    value
        .trim()
        .parse()
        .map_err(|err| format!("expected a number of minutes: {err}"))
}
