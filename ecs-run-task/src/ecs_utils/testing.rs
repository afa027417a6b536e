// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ecs_utils::{
        ContainerDetail, EcsApi, RunTaskRequest, ServiceList, TaskDefinition, TaskDetail,
        TaskList,
    },
    orchestrator::{OrchError, OrchResult},
};
use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex};

pub const TASK_DEFINITION_ARN: &str =
    "arn:aws:ecs:us-east-1:123456789012:task-definition/migrate:7";

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    DescribeServices { cluster: String, service: String },
    RegisterTaskDefinition { family: Option<String> },
    RunTask(RunTaskRequest),
    DescribeTasks { cluster: String, task_arns: Vec<String> },
}

/// Records every call and replays canned responses.
///
/// Describe-tasks responses are consumed in order; the last one repeats.
#[derive(Default)]
pub struct MockEcs {
    services: ServiceList,
    run_task: TaskList,
    describe_tasks: Mutex<VecDeque<TaskList>>,
    describe_tasks_error: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl MockEcs {
    pub fn with_services(mut self, services: ServiceList) -> Self {
        self.services = services;
        self
    }

    pub fn with_run_task(mut self, run_task: TaskList) -> Self {
        self.run_task = run_task;
        self
    }

    pub fn with_describe_tasks(self, responses: Vec<TaskList>) -> Self {
        *self.describe_tasks.lock().unwrap() = responses.into();
        self
    }

    pub fn with_describe_tasks_error(mut self, msg: &str) -> Self {
        self.describe_tasks_error = Some(msg.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn describe_tasks_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::DescribeTasks { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EcsApi for MockEcs {
    async fn describe_services(&self, cluster: &str, service: &str) -> OrchResult<ServiceList> {
        self.record(Call::DescribeServices {
            cluster: cluster.to_string(),
            service: service.to_string(),
        });
        Ok(self.services.clone())
    }

    async fn register_task_definition(
        &self,
        task_definition: &TaskDefinition,
    ) -> OrchResult<String> {
        self.record(Call::RegisterTaskDefinition {
            family: task_definition.family.clone(),
        });
        Ok(TASK_DEFINITION_ARN.to_string())
    }

    async fn run_task(&self, request: &RunTaskRequest) -> OrchResult<TaskList> {
        self.record(Call::RunTask(request.clone()));
        Ok(self.run_task.clone())
    }

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> OrchResult<TaskList> {
        self.record(Call::DescribeTasks {
            cluster: cluster.to_string(),
            task_arns: task_arns.to_vec(),
        });
        if let Some(msg) = &self.describe_tasks_error {
            return Err(OrchError::Ecs { dbg: msg.clone() });
        }

        let mut responses = self.describe_tasks.lock().unwrap();
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };
        Ok(response.unwrap_or_default())
    }
}

// Tasks given as (arn, last status) pairs, each with one successful container.
pub fn task_list(tasks: &[(&str, &str)]) -> TaskList {
    TaskList {
        tasks: tasks
            .iter()
            .map(|(arn, status)| TaskDetail {
                task_arn: Some(arn.to_string()),
                last_status: Some(status.to_string()),
                containers: vec![ContainerDetail {
                    name: Some("app".to_string()),
                    exit_code: Some(0),
                    reason: None,
                }],
            })
            .collect(),
        failures: vec![],
    }
}
