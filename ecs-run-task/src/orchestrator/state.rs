// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;

pub const STATE: State = State {
    version: "v0.1.0",

    // wait
    poll_delay_tasks: Duration::from_secs(5),
    default_wait_minutes: 360, // 6 hours

    // ecs
    stopped_status: "STOPPED",
    wait_enabled_value: "true",
};

pub struct State {
    pub version: &'static str,

    // wait
    pub poll_delay_tasks: Duration,
    pub default_wait_minutes: u64,

    // ecs
    pub stopped_status: &'static str,
    pub wait_enabled_value: &'static str,
}

impl State {
    // Number of polls which fit in `minutes` at the fixed poll delay.
    pub fn max_poll_attempts(&self, minutes: u64) -> u64 {
        minutes.saturating_mul(60) / self.poll_delay_tasks.as_secs()
    }
}
