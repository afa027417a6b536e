// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::orchestrator::{OrchResult, STATE};
use aws_config::BehaviorVersion;
use aws_types::region::Region;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod ecs_utils;
mod orchestrator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout is reserved for workflow commands
    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .init();

    info!(
        "ecs-run-task {} started at {}",
        STATE.version,
        humantime::format_rfc3339_seconds(std::time::SystemTime::now())
    );

    let cli = orchestrator::Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:?}", err);
            println!("{}", orchestrator::workflow_error(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: orchestrator::Cli) -> OrchResult<()> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = cli.region() {
        loader = loader.region(Region::new(region));
    }
    let aws_config = loader.load().await;

    let config = cli.check_requirements()?;
    let ecs_client = aws_sdk_ecs::Client::new(&aws_config);

    orchestrator::run(&config, &ecs_client).await?;
    Ok(())
}
