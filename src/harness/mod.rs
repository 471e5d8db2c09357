//! Container orchestration seams.
//!
//! [`CommandRunner`] and [`ClusterLifecycle`] are the only ways scenario code
//! touches docker. [`TestCluster`] implements both on top of the compose CLI;
//! unit tests substitute the generated mocks.

mod check;
mod cluster;
mod docker;
mod fixture;
mod machine;
mod process;
pub use check::*;
pub use cluster::*;
pub use docker::*;
pub use fixture::*;
pub use machine::*;
pub use process::*;


use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Result;

/// Host directory bind-mounted into a one-shot container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bind {
    pub host: PathBuf,
    pub container: String,
}

impl Bind {
    pub fn new(
        host: impl Into<PathBuf>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }
}

impl fmt::Display for Bind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}", self.host.display(), self.container)
    }
}

/// Remote command execution
///
/// Both operations wait for the remote command to exit and hand back its
/// combined output. Exit codes are not interpreted here.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` through `sh -c` inside the running container of `service`
    async fn run_command_on_service(
        &self,
        service: &str,
        command: &str,
    ) -> Result<String>;

    /// Launches a throw-away container from `image`, runs `command` and
    /// removes the container
    async fn run_with_image(
        &self,
        image: &str,
        command: &str,
        binds: &[Bind],
    ) -> Result<String>;
}

/// Lifecycle of a named multi-service topology
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterLifecycle: Send + Sync {
    async fn start(&self) -> Result<()>;

    /// Stops and removes every container of the topology. Idempotent.
    async fn shutdown(&self) -> Result<()>;

    /// `true` when every declared service has a running container
    async fn is_running(&self) -> Result<bool>;

    /// Log output of `service`; `stopped` also considers exited containers
    async fn service_logs(
        &self,
        service: &str,
        stopped: bool,
    ) -> Result<String>;
}
