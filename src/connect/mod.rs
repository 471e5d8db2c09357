//! Kafka Connect scenario steps.
//!
//! Every REST call and file probe runs in a throw-away helper container
//! (`connect.image`) on the configured network, so the scenarios need nothing
//! but docker on the machine running them.

mod connector;
pub use connector::*;


use std::path::Path;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::check_service;
use crate::classify_connector_status;
use crate::classify_record_count;
use crate::connect_health;
use crate::constants::CONTAINER_DATA_DIR;
use crate::ensure_service;
use crate::parse_connector_status;
use crate::poll_until_converged;
use crate::topic_create;
use crate::Bind;
use crate::CheckOutcome;
use crate::CommandRunner;
use crate::ConnectorStatus;
use crate::HarnessConfig;
use crate::PollOutcome;
use crate::ProbeError;
use crate::RecordCount;
use crate::Result;

/// Posts `spec` to the worker at `host:port` and polls its status until it
/// is `RUNNING`, `FAILED`, or the connector-status budget is spent.
///
/// Status requests that return an API error (404 while the worker is still
/// registering the connector) or unparsable output are retried.
pub async fn create_connector<R>(
    runner: &R,
    config: &HarnessConfig,
    spec: &ConnectorSpec,
    host: &str,
    port: u16,
) -> Result<PollOutcome<ConnectorStatus>>
where
    R: CommandRunner + ?Sized,
{
    let image = config.connect.image.as_str();

    info!(connector = spec.name(), host, port, "creating connector");
    let response = runner
        .run_with_image(image, &spec.create_command(host, port), &[])
        .await?;
    debug!(connector = spec.name(), "create response: {}", response.trim());

    let status = status_command(host, port, spec.name());
    let status = status.as_str();
    let outcome = poll_until_converged(
        move || async move {
            let output = runner
                .run_with_image(image, status, &[])
                .await
                .map_err(|e| ProbeError::Unreachable(e.to_string()))?;
            parse_connector_status(&output)
        },
        classify_connector_status,
        config.poll.connector_status,
    )
    .await;

    if !outcome.is_converged() {
        warn!(
            connector = spec.name(),
            state = ?outcome.last.as_ref().map(ConnectorStatus::state),
            attempts = outcome.attempts,
            "connector did not reach RUNNING"
        );
    }
    Ok(outcome)
}

/// Writes `records` sequential lines into `file` under `host_dir`, removing
/// text files left over from earlier runs
pub async fn create_file_source_test_data<R>(
    runner: &R,
    config: &HarnessConfig,
    host_dir: &Path,
    file: &str,
    records: u64,
) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    info!(host_dir = %host_dir.display(), file, records, "seeding file source data");
    runner
        .run_with_image(
            &config.connect.image,
            &seed_file_command(file, records),
            &[Bind::new(host_dir, CONTAINER_DATA_DIR)],
        )
        .await?;
    Ok(())
}

/// Polls the line count of a file sink's output until exactly `expected`
/// records are present or the record-count budget is spent
pub async fn wait_for_sink_records<R>(
    runner: &R,
    config: &HarnessConfig,
    host_dir: &Path,
    file: &str,
    expected: u64,
) -> Result<PollOutcome<RecordCount>>
where
    R: CommandRunner + ?Sized,
{
    let image = config.connect.image.as_str();
    let binds = [Bind::new(host_dir, CONTAINER_DATA_DIR)];
    let binds = &binds[..];
    let command = record_count_command(file);
    let command = command.as_str();

    let outcome = poll_until_converged(
        move || async move {
            let output = runner
                .run_with_image(image, command, binds)
                .await
                .map_err(|e| ProbeError::Unreachable(e.to_string()))?;
            output.parse::<RecordCount>()
        },
        classify_record_count(expected),
        config.poll.record_count,
    )
    .await;

    match &outcome.last {
        Some(count) if outcome.is_converged() => {
            info!(file, %count, attempts = outcome.attempts, "sink caught up")
        }
        last => warn!(file, expected, ?last, "sink did not reach the expected record count"),
    }
    Ok(outcome)
}

/// Creates the worker's internal topics (`<prefix>.config`, `.status`,
/// `.offsets`) and the data topic on `kafka_service`
pub async fn create_topics<R>(
    runner: &R,
    kafka_service: &str,
    internal_prefix: &str,
    data_topic: &str,
) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    for suffix in ["config", "status", "offsets"] {
        let topic = format!("{internal_prefix}.{suffix}");
        ensure_service(runner, kafka_service, &topic_create(&topic)).await?;
    }
    ensure_service(runner, kafka_service, &topic_create(data_topic)).await
}

/// Health of the worker in `service` listening on `port`
pub async fn connect_is_healthy<R>(
    runner: &R,
    service: &str,
    port: u16,
) -> Result<CheckOutcome>
where
    R: CommandRunner + ?Sized,
{
    check_service(runner, service, &connect_health("localhost", port)).await
}
