use std::fmt;
use std::str::FromStr;

use super::PollState;
use crate::constants::ABSENT_RECORD_COUNT;
use crate::ProbeError;

/// Line count of a sink file as seen by the count probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCount {
    /// The file does not exist yet
    Absent,
    Observed(u64),
}

impl RecordCount {
    /// Maps the probe's raw integer, where `-1` means absent
    pub fn from_raw(raw: i64) -> std::result::Result<Self, ProbeError> {
        match raw {
            ABSENT_RECORD_COUNT => Ok(RecordCount::Absent),
            n if n >= 0 => Ok(RecordCount::Observed(n as u64)),
            n => Err(ProbeError::InvalidCount(n.to_string())),
        }
    }

    pub fn as_raw(&self) -> i64 {
        match self {
            RecordCount::Absent => ABSENT_RECORD_COUNT,
            RecordCount::Observed(n) => *n as i64,
        }
    }
}

impl fmt::Display for RecordCount {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            RecordCount::Absent => write!(f, "absent"),
            RecordCount::Observed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for RecordCount {
    type Err = ProbeError;

    /// Takes the first line of `s` that is an integer
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw = s
            .lines()
            .find_map(|line| line.trim().parse::<i64>().ok())
            .ok_or_else(|| ProbeError::InvalidCount(s.trim().to_string()))?;
        RecordCount::from_raw(raw)
    }
}

/// Converges once exactly `expected` records are present.
///
/// Never reports a terminal failure: a short or overshooting count keeps
/// polling until the budget is spent.
pub fn classify_record_count(expected: u64) -> impl Fn(&RecordCount) -> PollState {
    move |count| match count {
        RecordCount::Observed(n) if *n == expected => PollState::TerminalSuccess,
        _ => PollState::Pending,
    }
}
