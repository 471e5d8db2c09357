use tracing::debug;

use super::exec;
use super::Bind;
use crate::Result;

/// Launches one-shot containers with `docker run --rm`
#[derive(Debug, Clone)]
pub struct ImageRunner {
    docker_bin: String,
    network_mode: String,
}

impl ImageRunner {
    pub fn new(
        docker_bin: impl Into<String>,
        network_mode: impl Into<String>,
    ) -> Self {
        Self {
            docker_bin: docker_bin.into(),
            network_mode: network_mode.into(),
        }
    }

    /// Runs `command` through `sh -c` in a fresh container and returns its
    /// combined output, whatever the exit code
    pub async fn run(
        &self,
        image: &str,
        command: &str,
        binds: &[Bind],
    ) -> Result<String> {
        let args = self.run_args(image, command, binds);
        debug!(image, binds = binds.len(), "docker run");
        let output = exec(&self.docker_bin, &args, None).await?;
        Ok(output.combined())
    }

    pub(crate) fn run_args(
        &self,
        image: &str,
        command: &str,
        binds: &[Bind],
    ) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "--network".to_string(),
            self.network_mode.clone(),
        ];
        for bind in binds {
            args.push("-v".to_string());
            args.push(bind.to_string());
        }
        args.push(image.to_string());
        args.extend(sh_c(command));
        args
    }
}

/// Wraps a shell snippet so it reaches the container as a single argument
pub(crate) fn sh_c(command: &str) -> [String; 3] {
    ["sh".to_string(), "-c".to_string(), command.to_string()]
}
