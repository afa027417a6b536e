// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ecs_utils::{EcsApi, TaskList},
    orchestrator::{OrchError, OrchResult, STATE},
};
use core::{task::Poll, time::Duration};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    pub delay: Duration,
    pub max_attempts: u64,
}

impl WaitPolicy {
    pub fn from_minutes(minutes: u64) -> Self {
        WaitPolicy {
            delay: STATE.poll_delay_tasks,
            max_attempts: STATE.max_poll_attempts(minutes),
        }
    }

    fn budget(&self) -> Duration {
        Duration::from_secs(self.delay.as_secs().saturating_mul(self.max_attempts))
    }
}

/// Poll the tasks until all of them have stopped.
///
/// Errors from the describe call abort the wait; failure entries do not, they
/// are checked once the wait has finished.
pub async fn wait_for_tasks_stopped<E: EcsApi + ?Sized>(
    ecs: &E,
    cluster: &str,
    task_arns: &[String],
    policy: WaitPolicy,
) -> OrchResult<()> {
    info!(
        "waiting up to {} for {} task(s) to stop",
        humantime::format_duration(policy.budget()),
        task_arns.len()
    );

    for attempt in 1..=policy.max_attempts {
        match poll_tasks_stopped(ecs, cluster, task_arns).await? {
            Poll::Ready(()) => {
                info!("tasks stopped after {attempt} poll(s)");
                return Ok(());
            }
            Poll::Pending => {
                debug!("tasks still running. attempt {attempt}/{}", policy.max_attempts);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(OrchError::WaitTimeout {
        dbg: format!(
            "Tasks did not stop within {}: max attempts {} exceeded",
            humantime::format_duration(policy.budget()),
            policy.max_attempts
        ),
    })
}

async fn poll_tasks_stopped<E: EcsApi + ?Sized>(
    ecs: &E,
    cluster: &str,
    task_arns: &[String],
) -> OrchResult<Poll<()>> {
    let tasks = ecs.describe_tasks(cluster, task_arns).await?;
    if all_stopped(&tasks) {
        Ok(Poll::Ready(()))
    } else {
        Ok(Poll::Pending)
    }
}

// An empty task list never counts as stopped.
fn all_stopped(tasks: &TaskList) -> bool {
    !tasks.tasks.is_empty()
        && tasks
            .tasks
            .iter()
            .all(|task| task.last_status.as_deref() == Some(STATE.stopped_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs_utils::testing::{task_list, Call, MockEcs};

    fn arns() -> Vec<String> {
        vec!["arn:task/1".to_string(), "arn:task/2".to_string()]
    }

    #[test]
    fn stopped_requires_every_task() {
        assert!(!all_stopped(&TaskList::default()));
        assert!(!all_stopped(&task_list(&[("arn:task/1", "STOPPED"), ("arn:task/2", "RUNNING")])));
        assert!(all_stopped(&task_list(&[("arn:task/1", "STOPPED"), ("arn:task/2", "STOPPED")])));
    }

    #[test]
    fn policy_from_minutes() {
        let policy = WaitPolicy::from_minutes(1);
        assert_eq!(policy.delay, Duration::from_secs(5));
        assert_eq!(policy.max_attempts, 12);
        assert_eq!(policy.budget(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_until_stopped() {
        let ecs = MockEcs::default().with_describe_tasks(vec![
            task_list(&[("arn:task/1", "PENDING"), ("arn:task/2", "PENDING")]),
            task_list(&[("arn:task/1", "RUNNING"), ("arn:task/2", "STOPPED")]),
            task_list(&[("arn:task/1", "STOPPED"), ("arn:task/2", "STOPPED")]),
        ]);

        let start = tokio::time::Instant::now();
        wait_for_tasks_stopped(&ecs, "batch", &arns(), WaitPolicy::from_minutes(1))
            .await
            .unwrap();

        assert_eq!(ecs.describe_tasks_calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert_eq!(
            ecs.calls()[0],
            Call::DescribeTasks {
                cluster: "batch".to_string(),
                task_arns: arns(),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out() {
        let ecs = MockEcs::default()
            .with_describe_tasks(vec![task_list(&[("arn:task/1", "RUNNING")])]);

        let err = wait_for_tasks_stopped(&ecs, "batch", &arns(), WaitPolicy::from_minutes(1))
            .await
            .unwrap_err();

        assert!(matches!(err, OrchError::WaitTimeout { .. }));
        assert_eq!(ecs.describe_tasks_calls(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn describe_error_aborts_wait() {
        let ecs = MockEcs::default().with_describe_tasks_error("AccessDeniedException");

        let err = wait_for_tasks_stopped(&ecs, "batch", &arns(), WaitPolicy::from_minutes(1))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "AccessDeniedException");
        assert_eq!(ecs.describe_tasks_calls(), 1);
    }
}
