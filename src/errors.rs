//! Harness Error Hierarchy
//!
//! Splits failures into the ones that end a scenario (configuration,
//! orchestration, spawn failures) and the transient ones a poller is allowed to
//! retry ([`ProbeError`]).

use std::path::PathBuf;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Harness configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Container orchestration and remote command failures
    #[error(transparent)]
    Harness(#[from] HarnessError),

    /// A probe that could not be evaluated, surfaced outside of a poll loop
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Local file system failures (log files, fixture staging)
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unrecoverable failures requiring the run to stop
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The orchestration CLI could not be launched at all
    #[error("Failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A lifecycle command exited non-zero
    #[error("`{command}` exited with {code:?}: {output}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// A readiness check printed something other than the pass token
    #[error("Check on service {service} failed: {output}")]
    CheckFailed { service: String, output: String },

    /// No container exists for the requested compose service
    #[error("No container found for service {0}")]
    ServiceNotFound(String),

    /// Fixture directory or compose file is missing
    #[error("Fixture not found at {0}")]
    FixtureNotFound(PathBuf),

    /// Required environment variable is not set
    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// A probe attempt that produced no usable observation.
///
/// Always retried by the poller until the attempt budget runs out.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The REST endpoint answered with an error body (`error_code` present)
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// The probe output could not be decoded
    #[error("Malformed payload: {output:?}")]
    MalformedPayload {
        output: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record count probe printed something that is not an integer
    #[error("Invalid record count: {0:?}")]
    InvalidCount(String),

    /// The probe command could not reach its target
    #[error("Probe target unreachable: {0}")]
    Unreachable(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Fatal(format!("JSON encoding failed: {e}"))
    }
}
