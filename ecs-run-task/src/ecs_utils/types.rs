// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::orchestrator::{OrchError, OrchResult};
use aws_sdk_ecs::types::{LaunchType, NetworkConfiguration};
use tracing::debug;

// A failure entry returned next to the results of a describe or run call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Failure {
    pub arn: Option<String>,
    pub reason: Option<String>,
}

impl From<&aws_sdk_ecs::types::Failure> for Failure {
    fn from(failure: &aws_sdk_ecs::types::Failure) -> Self {
        Failure {
            arn: failure.arn().map(|s| s.to_string()),
            reason: failure.reason().map(|s| s.to_string()),
        }
    }
}

/// Only the first failure entry is surfaced, even if more were reported.
pub fn confirm_no_failure(failures: &[Failure]) -> OrchResult<()> {
    match failures.first() {
        Some(failure) => Err(OrchError::Failure {
            arn: failure.arn.clone().unwrap_or_default(),
            reason: failure.reason.clone().unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

// The parts of a service which a launched task inherits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceDetail {
    pub service_arn: Option<String>,
    pub launch_type: Option<LaunchType>,
    pub network_configuration: Option<NetworkConfiguration>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceList {
    pub services: Vec<ServiceDetail>,
    pub failures: Vec<Failure>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunTaskRequest {
    pub cluster: String,
    pub count: i32,
    pub task_definition_arn: String,
    pub launch_type: Option<LaunchType>,
    pub network_configuration: Option<NetworkConfiguration>,
}

impl RunTaskRequest {
    // Launch settings always come from the service, never the task definition.
    pub fn new(
        cluster: &str,
        count: i32,
        task_definition_arn: String,
        service: &ServiceDetail,
    ) -> Self {
        RunTaskRequest {
            cluster: cluster.to_string(),
            count,
            task_definition_arn,
            launch_type: service.launch_type.clone(),
            network_configuration: service.network_configuration.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerDetail {
    pub name: Option<String>,
    pub exit_code: Option<i32>,
    pub reason: Option<String>,
}

impl ContainerDetail {
    // A container without an exit code never reported success.
    pub fn failed(&self) -> bool {
        self.exit_code != Some(0)
    }
}

impl From<&aws_sdk_ecs::types::Container> for ContainerDetail {
    fn from(container: &aws_sdk_ecs::types::Container) -> Self {
        ContainerDetail {
            name: container.name().map(|s| s.to_string()),
            exit_code: container.exit_code(),
            reason: container.reason().map(|s| s.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskDetail {
    pub task_arn: Option<String>,
    pub last_status: Option<String>,
    pub containers: Vec<ContainerDetail>,
}

impl From<&aws_sdk_ecs::types::Task> for TaskDetail {
    fn from(task: &aws_sdk_ecs::types::Task) -> Self {
        TaskDetail {
            task_arn: task.task_arn().map(|s| s.to_string()),
            last_status: task.last_status().map(|s| s.to_string()),
            containers: task.containers().iter().map(ContainerDetail::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskList {
    pub tasks: Vec<TaskDetail>,
    pub failures: Vec<Failure>,
}

impl TaskList {
    pub fn task_arns(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter_map(|task| task.task_arn.clone())
            .collect()
    }

    /// Unlike failure entries, every failed container is reported.
    pub fn confirm_containers_succeeded(&self) -> OrchResult<()> {
        let reasons: Vec<String> = self
            .tasks
            .iter()
            .flat_map(|task| task.containers.iter())
            .filter(|container| container.failed())
            .map(|container| {
                debug!(
                    "container {:?} exited with {:?}: {:?}",
                    container.name, container.exit_code, container.reason
                );
                container.reason.clone().unwrap_or_default()
            })
            .collect();

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(OrchError::TaskFailed { reasons })
        }
    }
}
