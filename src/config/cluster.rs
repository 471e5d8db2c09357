use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Where the orchestration tooling lives and which topology to bring up
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterConfig {
    /// Docker CLI used for `run`, `logs` and as the compose front-end
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,

    /// Arguments selecting the compose plugin, e.g. `["compose"]`
    #[serde(default = "default_compose_args")]
    pub compose_args: Vec<String>,

    /// docker-machine CLI used for host staging
    #[serde(default = "default_machine_bin")]
    pub machine_bin: String,

    /// Compose project name; isolates containers of concurrent suites
    #[serde(default = "default_project")]
    pub project: String,

    /// Directory holding compose files and fixture data
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Compose file name relative to `fixtures_dir`
    #[serde(default = "default_compose_file")]
    pub compose_file: String,

    /// Checks run by the binary once the topology is up
    #[serde(default)]
    pub readiness: Vec<ReadinessCheck>,
}

/// A command expected to print the pass token inside a service container
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReadinessCheck {
    pub service: String,
    pub command: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            docker_bin: default_docker_bin(),
            compose_args: default_compose_args(),
            machine_bin: default_machine_bin(),
            project: default_project(),
            fixtures_dir: default_fixtures_dir(),
            compose_file: default_compose_file(),
            readiness: vec![],
        }
    }
}

impl ClusterConfig {
    /// Validates cluster configuration consistency
    /// # Errors
    /// Returns `Error::Config` if any configuration rules are violated
    pub fn validate(&self) -> Result<()> {
        if self.docker_bin.trim().is_empty() {
            return Err(invalid("cluster.docker_bin cannot be empty"));
        }
        if self.machine_bin.trim().is_empty() {
            return Err(invalid("cluster.machine_bin cannot be empty"));
        }

        // Compose only accepts lowercase alphanumerics, dashes and underscores
        if self.project.is_empty()
            || !self
                .project
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(invalid(&format!(
                "cluster.project {:?} is not a valid compose project name",
                self.project
            )));
        }

        if self.compose_file.trim().is_empty() {
            return Err(invalid("cluster.compose_file cannot be empty"));
        }

        for (i, check) in self.readiness.iter().enumerate() {
            if check.service.trim().is_empty() || check.command.trim().is_empty() {
                return Err(invalid(&format!(
                    "cluster.readiness[{i}] needs both service and command"
                )));
            }
        }

        Ok(())
    }

    /// Absolute or cwd-relative path of the compose file
    pub fn compose_path(&self) -> PathBuf {
        self.fixtures_dir.join(&self.compose_file)
    }
}

pub(super) fn invalid(msg: &str) -> Error {
    Error::Config(ConfigError::Message(msg.to_string()))
}

fn default_docker_bin() -> String {
    "docker".to_string()
}
fn default_compose_args() -> Vec<String> {
    vec!["compose".to_string()]
}
fn default_machine_bin() -> String {
    "docker-machine".to_string()
}
fn default_project() -> String {
    "connect-harness".to_string()
}
fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("tests/fixtures/kafka-connect")
}
fn default_compose_file() -> String {
    "distributed-config.yml".to_string()
}
