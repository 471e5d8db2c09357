use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Fixed-delay polling policy
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of probe invocations (must be at least 1)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Pause between two attempts (unit: milliseconds)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl PollPolicy {
    /// Sub-millisecond remainders round up; delays beyond `u64::MAX` ms saturate
    pub fn new(
        max_attempts: usize,
        delay: Duration,
    ) -> Self {
        let mut delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        if delay.subsec_nanos() % 1_000_000 != 0 {
            delay_ms = delay_ms.saturating_add(1);
        }
        Self {
            max_attempts,
            delay_ms,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(
        &self,
        name: &str,
    ) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Config(ConfigError::Message(format!(
                "poll.{name}.max_attempts must be at least 1"
            ))));
        }
        Ok(())
    }
}

/// Polling policies divided by what is being waited on
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PollPolicies {
    /// Waiting for a freshly created connector to leave `UNASSIGNED`
    #[serde(default = "default_connector_status")]
    pub connector_status: PollPolicy,

    /// Waiting for a file sink to hold the expected number of lines
    #[serde(default = "default_record_count")]
    pub record_count: PollPolicy,
}

impl Default for PollPolicies {
    fn default() -> Self {
        Self {
            connector_status: default_connector_status(),
            record_count: default_record_count(),
        }
    }
}

impl PollPolicies {
    pub fn validate(&self) -> Result<()> {
        self.connector_status.validate("connector_status")?;
        self.record_count.validate("record_count")?;
        Ok(())
    }
}

fn default_connector_status() -> PollPolicy {
    PollPolicy {
        max_attempts: 25,
        delay_ms: 1000,
    }
}
fn default_record_count() -> PollPolicy {
    PollPolicy {
        max_attempts: 60,
        delay_ms: 10_000,
    }
}
fn default_max_attempts() -> usize {
    10
}
fn default_delay_ms() -> u64 {
    1000
}
