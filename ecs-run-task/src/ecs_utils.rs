// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::orchestrator::OrchResult;
use async_trait::async_trait;

mod client;
mod task_definition;
#[cfg(test)]
pub(crate) mod testing;
mod types;
mod waiter;

pub use task_definition::TaskDefinition;
pub use types::{
    confirm_no_failure, ContainerDetail, Failure, RunTaskRequest, ServiceDetail, ServiceList,
    TaskDetail, TaskList,
};
pub use waiter::{wait_for_tasks_stopped, WaitPolicy};

/// The ECS operations a run is made of.
///
/// Implemented by [`aws_sdk_ecs::Client`]; tests substitute a recording mock.
#[async_trait]
pub trait EcsApi {
    async fn describe_services(&self, cluster: &str, service: &str) -> OrchResult<ServiceList>;

    /// Register a new revision and return its ARN.
    async fn register_task_definition(
        &self,
        task_definition: &TaskDefinition,
    ) -> OrchResult<String>;

    async fn run_task(&self, request: &RunTaskRequest) -> OrchResult<TaskList>;

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> OrchResult<TaskList>;
}
