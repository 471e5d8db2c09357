//! Readiness checks built on the `PASS`/`FAIL` fixture convention.
//!
//! The textual token is interpreted here and nowhere else; callers get a
//! [`CheckOutcome`]. Checks are single-shot: the commands themselves carry
//! their own wait loops (`cub`, `dub`), so no retry is layered on top.

use tracing::debug;
use tracing::warn;

use super::CommandRunner;
use crate::constants::PASS_TOKEN;
use crate::HarnessError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    /// Carries the command output for diagnostics
    Fail { output: String },
}

impl CheckOutcome {
    pub fn from_output(output: &str) -> Self {
        if output.contains(PASS_TOKEN) {
            CheckOutcome::Pass
        } else {
            CheckOutcome::Fail {
                output: output.trim().to_string(),
            }
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass)
    }

    pub fn into_result(
        self,
        service: &str,
    ) -> Result<()> {
        match self {
            CheckOutcome::Pass => Ok(()),
            CheckOutcome::Fail { output } => Err(HarnessError::CheckFailed {
                service: service.to_string(),
                output,
            }
            .into()),
        }
    }
}

fn pass_or_fail(body: &str) -> String {
    format!("bash -c '{body} && echo PASS || echo FAIL'")
}

/// Waits for a zookeeper ensemble, e.g. `localhost:22181,localhost:32181`
pub fn zk_ready(servers: &str) -> String {
    pass_or_fail(&format!("cub zk-ready {servers} 10 10 2"))
}

/// Waits until `brokers` brokers registered in zookeeper
pub fn kafka_ready(brokers: usize) -> String {
    pass_or_fail(&format!(
        "cub kafka-ready $KAFKA_ZOOKEEPER_CONNECT {brokers} 20 20 10"
    ))
}

pub fn schema_registry_ready(
    host: &str,
    port: u16,
) -> String {
    pass_or_fail(&format!("cub sr-ready {host} {port} 20"))
}

/// Waits for the worker port, then requires the connectors endpoint to answer
pub fn connect_health(
    host: &str,
    port: u16,
) -> String {
    pass_or_fail(&format!(
        "dub wait {host} {port} 30 && curl -X GET --fail --silent {host}:{port}/connectors"
    ))
}

/// Idempotent single-partition topic creation
pub fn topic_create(name: &str) -> String {
    pass_or_fail(&format!(
        "kafka-topics --create --topic {name} --partitions 1 --replication-factor 1 --if-not-exists --zookeeper $KAFKA_ZOOKEEPER_CONNECT"
    ))
}

pub async fn check_service<R>(
    runner: &R,
    service: &str,
    command: &str,
) -> Result<CheckOutcome>
where
    R: CommandRunner + ?Sized,
{
    let output = runner.run_command_on_service(service, command).await?;
    let outcome = CheckOutcome::from_output(&output);
    if outcome.is_pass() {
        debug!(service, "check passed");
    } else {
        warn!(service, "check failed: {}", output.trim());
    }
    Ok(outcome)
}

/// [`check_service`] turning a failed check into [`HarnessError::CheckFailed`]
pub async fn ensure_service<R>(
    runner: &R,
    service: &str,
    command: &str,
) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    check_service(runner, service, command).await?.into_result(service)
}
