use std::env;
use std::path::Path;

use tracing::debug;

use super::exec_checked;
use crate::constants::DOCKER_MACHINE_NAME_ENV;
use crate::ClusterConfig;
use crate::HarnessError;
use crate::Result;

/// Handle on the docker-machine host the clusters run on.
///
/// Host-network fixtures bind-mount directories of this host, so test data
/// has to be staged here before the topology starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMachine {
    name: String,
    machine_bin: String,
}

impl TestMachine {
    pub fn new(
        name: impl Into<String>,
        machine_bin: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            machine_bin: machine_bin.into(),
        }
    }

    /// Resolves the machine from `DOCKER_MACHINE_NAME`
    ///
    /// # Errors
    /// [`HarnessError::MissingEnv`] when the variable is unset or empty
    pub fn from_env(config: &ClusterConfig) -> Result<Self> {
        match env::var(DOCKER_MACHINE_NAME_ENV) {
            Ok(name) if !name.trim().is_empty() => Ok(Self::new(name.trim(), &config.machine_bin)),
            _ => Err(HarnessError::MissingEnv(DOCKER_MACHINE_NAME_ENV).into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `command` on the machine and returns its stdout
    pub async fn ssh(
        &self,
        command: &str,
    ) -> Result<String> {
        debug!(machine = %self.name, "ssh: {}", command);
        let output = exec_checked(&self.machine_bin, &self.ssh_args(command), None).await?;
        Ok(output.stdout)
    }

    /// Recursively copies `local` to `remote` on the machine
    pub async fn scp_to_machine(
        &self,
        local: &Path,
        remote: &str,
    ) -> Result<()> {
        if !local.exists() {
            return Err(HarnessError::FixtureNotFound(local.to_path_buf()).into());
        }
        debug!(machine = %self.name, "scp {} -> {}", local.display(), remote);
        exec_checked(&self.machine_bin, &self.scp_args(local, remote), None).await?;
        Ok(())
    }

    pub(crate) fn ssh_args(
        &self,
        command: &str,
    ) -> Vec<String> {
        vec!["ssh".to_string(), self.name.clone(), command.to_string()]
    }

    pub(crate) fn scp_args(
        &self,
        local: &Path,
        remote: &str,
    ) -> Vec<String> {
        vec![
            "scp".to_string(),
            "-r".to_string(),
            local.display().to_string(),
            format!("{}:{}", self.name, remote),
        ]
    }
}
