// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ecs_utils::{
        EcsApi, Failure, RunTaskRequest, ServiceDetail, ServiceList, TaskDefinition, TaskDetail,
        TaskList,
    },
    orchestrator::{OrchError, OrchResult},
};
use async_trait::async_trait;
use aws_sdk_ecs::error::DisplayErrorContext;
use tracing::debug;

fn ecs_err<E: std::error::Error>(op: &str, err: E) -> OrchError {
    OrchError::Ecs {
        dbg: format!("{op} failed. {}", DisplayErrorContext(err)),
    }
}

#[async_trait]
impl EcsApi for aws_sdk_ecs::Client {
    async fn describe_services(&self, cluster: &str, service: &str) -> OrchResult<ServiceList> {
        debug!("describe_services - cluster: {cluster} service: {service}");
        let output = self
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_err(|err| ecs_err("DescribeServices", err))?;
        debug!("describe_services - {:?}", output);

        let services = output
            .services()
            .iter()
            .map(|service| ServiceDetail {
                service_arn: service.service_arn().map(|s| s.to_string()),
                launch_type: service.launch_type().cloned(),
                network_configuration: service.network_configuration().cloned(),
            })
            .collect();
        Ok(ServiceList {
            services,
            failures: output.failures().iter().map(Failure::from).collect(),
        })
    }

    async fn register_task_definition(
        &self,
        task_definition: &TaskDefinition,
    ) -> OrchResult<String> {
        let request = task_definition.to_request(self.register_task_definition())?;
        debug!("register_task_definition - {:?}", request.as_input());
        let output = request
            .send()
            .await
            .map_err(|err| ecs_err("RegisterTaskDefinition", err))?;
        debug!("register_task_definition - {:?}", output);

        output
            .task_definition()
            .and_then(|task_definition| task_definition.task_definition_arn())
            .map(|arn| arn.to_string())
            .ok_or(OrchError::Ecs {
                dbg: "RegisterTaskDefinition returned no task definition arn".to_string(),
            })
    }

    async fn run_task(&self, request: &RunTaskRequest) -> OrchResult<TaskList> {
        debug!("run_task - {:?}", request);
        let output = self
            .run_task()
            .cluster(&request.cluster)
            .count(request.count)
            .task_definition(&request.task_definition_arn)
            .set_launch_type(request.launch_type.clone())
            .set_network_configuration(request.network_configuration.clone())
            .send()
            .await
            .map_err(|err| ecs_err("RunTask", err))?;
        debug!("run_task - {:?}", output);

        Ok(TaskList {
            tasks: output.tasks().iter().map(TaskDetail::from).collect(),
            failures: output.failures().iter().map(Failure::from).collect(),
        })
    }

    async fn describe_tasks(&self, cluster: &str, task_arns: &[String]) -> OrchResult<TaskList> {
        debug!("describe_tasks - cluster: {cluster} tasks: {:?}", task_arns);
        let output = self
            .describe_tasks()
            .cluster(cluster)
            .set_tasks(Some(task_arns.to_vec()))
            .send()
            .await
            .map_err(|err| ecs_err("DescribeTasks", err))?;
        debug!("describe_tasks - {:?}", output);

        Ok(TaskList {
            tasks: output.tasks().iter().map(TaskDetail::from).collect(),
            failures: output.failures().iter().map(Failure::from).collect(),
        })
    }
}
