//! Convergence polling.
//!
//! A poll repeatedly invokes a probe against external state, classifies each
//! observation, and stops on the first terminal classification or once the
//! attempt budget of its [`PollPolicy`] is spent. Attempts never overlap: each
//! probe is awaited to completion before the next one starts.
//!
//! Exhausting the budget is not an error. The poller hands back the last
//! observation and leaves the verdict to the caller.

mod connector_status;
mod record_count;
pub use connector_status::*;
pub use record_count::*;


use std::future::Future;

use tokio::time::sleep;
use tracing::debug;
use tracing::warn;

use crate::PollPolicy;
use crate::ProbeError;

/// Classification of one poll attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Observation is valid but not final yet; keep polling
    Pending,
    /// Expected condition reached; stop
    TerminalSuccess,
    /// Authoritative failure reported by the target; stop
    TerminalFailure,
    /// Probe could not be evaluated this attempt; keep polling
    TransientError,
}

impl PollState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::TerminalSuccess | PollState::TerminalFailure)
    }
}

/// What a finished poll observed
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome<T> {
    /// Classification of the final attempt
    pub state: PollState,
    /// Most recent probe result; `None` when no attempt produced one
    pub last: Option<T>,
    /// Number of probe invocations performed
    pub attempts: usize,
}

impl<T> PollOutcome<T> {
    pub fn is_converged(&self) -> bool {
        self.state == PollState::TerminalSuccess
    }

    pub fn is_failed(&self) -> bool {
        self.state == PollState::TerminalFailure
    }

    /// Budget ran out before any terminal classification
    pub fn is_exhausted(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn into_parts(self) -> (PollState, Option<T>) {
        (self.state, self.last)
    }
}

/// Polls `probe` until `classify` reports a terminal state or
/// `policy.max_attempts` probes have run.
///
/// Sleeps `policy.delay()` between attempts, never after the final one. A
/// budget of zero is treated as one attempt.
///
/// # Returns
/// The final attempt's state together with the most recent successful
/// observation. Probe errors are classified as [`PollState::TransientError`]
/// and do not replace the last observation.
pub async fn poll_until_converged<T, P, Fut, C>(
    mut probe: P,
    classify: C,
    policy: PollPolicy,
) -> PollOutcome<T>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, ProbeError>>,
    C: Fn(&T) -> PollState,
{
    let max_attempts = policy.max_attempts.max(1);
    let delay = policy.delay();

    let mut state = PollState::Pending;
    let mut last = None;
    let mut attempts = 0;

    while attempts < max_attempts {
        attempts += 1;

        match probe().await {
            Ok(result) => {
                state = classify(&result);
                debug!(attempt = attempts, max_attempts, ?state, "probe observed");
                last = Some(result);

                if state.is_terminal() {
                    return PollOutcome {
                        state,
                        last,
                        attempts,
                    };
                }
            }
            Err(e) => {
                debug!(attempt = attempts, max_attempts, "probe failed, will retry: {}", e);
                state = PollState::TransientError;
            }
        }

        if attempts < max_attempts {
            sleep(delay).await;
        }
    }

    warn!(attempts, ?state, "poll budget exhausted without a terminal state");
    PollOutcome {
        state,
        last,
        attempts,
    }
}
