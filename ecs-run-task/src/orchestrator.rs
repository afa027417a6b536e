// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::ecs_utils::{
    confirm_no_failure, wait_for_tasks_stopped, EcsApi, RunTaskRequest, TaskDefinition,
};
use tracing::info;

mod cli;
mod error;
mod report;
mod state;

pub use cli::{Cli, OrchestratorConfig};
pub use error::{OrchError, OrchResult};
pub use report::workflow_error;
pub use state::STATE;

/// Register the task definition and run it like the service runs its tasks.
///
/// Returns the ARNs of the launched tasks. Nothing is rolled back if a later
/// step fails: the registered revision and launched tasks stay in place.
pub async fn run<E: EcsApi + ?Sized>(
    config: &OrchestratorConfig,
    ecs: &E,
) -> OrchResult<Vec<String>> {
    // a document which doesn't parse aborts before anything is sent to ECS
    let task_definition = TaskDefinition::from_file(&config.task_definition_path)?;

    let services = ecs
        .describe_services(&config.cluster, &config.service)
        .await?;
    confirm_no_failure(&services.failures)?;
    let service = services.services.first().ok_or(OrchError::Ecs {
        dbg: format!(
            "Service {} not found in cluster {}",
            config.service, config.cluster
        ),
    })?;
    info!(
        "service {}: launch type {:?}",
        service.service_arn.as_deref().unwrap_or(&config.service),
        service.launch_type
    );

    let task_definition_arn = ecs.register_task_definition(&task_definition).await?;
    info!("registered task definition {task_definition_arn}");

    let request = RunTaskRequest::new(
        &config.cluster,
        config.count,
        task_definition_arn,
        service,
    );
    let launched = ecs.run_task(&request).await?;
    confirm_no_failure(&launched.failures)?;

    let task_arns = launched.task_arns();
    info!("launched tasks {:?}", task_arns);

    if config.wait_for_finish {
        wait_for_tasks_stopped(ecs, &config.cluster, &task_arns, config.wait_policy()).await?;

        let stopped = ecs.describe_tasks(&config.cluster, &task_arns).await?;
        confirm_no_failure(&stopped.failures)?;
        stopped.confirm_containers_succeeded()?;
        info!("all tasks finished successfully");
    }

    Ok(task_arns)
}
