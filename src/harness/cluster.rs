use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::docker::sh_c;
use super::exec;
use super::exec_checked;
use super::Bind;
use super::ClusterLifecycle;
use super::CommandRunner;
use super::ImageRunner;
use crate::ClusterConfig;
use crate::HarnessConfig;
use crate::HarnessError;
use crate::Result;

/// A compose topology addressed by project name
///
/// Every compose invocation is pinned to the same project, file and project
/// directory so relative bind mounts resolve against the fixtures directory.
#[derive(Debug)]
pub struct TestCluster {
    project: String,
    fixtures_dir: PathBuf,
    compose_file: String,
    docker_bin: String,
    compose_args: Vec<String>,
    images: ImageRunner,
    started: AtomicBool,
}

impl TestCluster {
    /// `compose_file` is resolved relative to `fixtures_dir`
    pub fn new(
        project: impl Into<String>,
        fixtures_dir: impl Into<PathBuf>,
        compose_file: impl Into<String>,
        config: &HarnessConfig,
    ) -> Self {
        Self {
            project: project.into(),
            fixtures_dir: fixtures_dir.into(),
            compose_file: compose_file.into(),
            docker_bin: config.cluster.docker_bin.clone(),
            compose_args: config.cluster.compose_args.clone(),
            images: ImageRunner::new(
                config.cluster.docker_bin.clone(),
                config.connect.network_mode.clone(),
            ),
            started: AtomicBool::new(false),
        }
    }

    /// Topology named by the `cluster` section
    pub fn from_config(config: &HarnessConfig) -> Self {
        let ClusterConfig {
            project,
            fixtures_dir,
            compose_file,
            ..
        } = &config.cluster;
        Self::new(project.clone(), fixtures_dir.clone(), compose_file.clone(), config)
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn compose_path(&self) -> PathBuf {
        self.fixtures_dir.join(&self.compose_file)
    }

    pub(crate) fn compose_command(
        &self,
        extra: &[&str],
    ) -> Vec<String> {
        let mut args = self.compose_args.clone();
        args.extend([
            "-p".to_string(),
            self.project.clone(),
            "-f".to_string(),
            self.compose_path().display().to_string(),
            "--project-directory".to_string(),
            self.fixtures_dir.display().to_string(),
        ]);
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    pub(crate) fn exec_args(
        &self,
        service: &str,
        command: &str,
    ) -> Vec<String> {
        let mut args = self.compose_command(&["exec", "-T", service]);
        args.extend(sh_c(command));
        args
    }

    pub(crate) fn down_args(&self) -> Vec<String> {
        self.compose_command(&["down", "--volumes", "--remove-orphans"])
    }

    async fn compose(
        &self,
        extra: &[&str],
    ) -> Result<String> {
        let output = exec_checked(&self.docker_bin, &self.compose_command(extra), None).await?;
        Ok(output.stdout)
    }

    async fn container_id(
        &self,
        service: &str,
        stopped: bool,
    ) -> Result<String> {
        let mut extra = vec!["ps", "-q"];
        if stopped {
            extra.push("--all");
        }
        extra.push(service);

        // `ps` exits non-zero for services the file does not declare
        let output = exec(&self.docker_bin, &self.compose_command(&extra), None).await?;
        first_line(&output.stdout)
            .map(str::to_string)
            .ok_or_else(|| HarnessError::ServiceNotFound(service.to_string()).into())
    }
}

#[async_trait]
impl ClusterLifecycle for TestCluster {
    async fn start(&self) -> Result<()> {
        let compose_path = self.compose_path();
        if !Path::new(&compose_path).is_file() {
            return Err(HarnessError::FixtureNotFound(compose_path).into());
        }

        info!(project = %self.project, compose = %compose_path.display(), "starting cluster");
        // Mark first: a partially started topology still needs `down`
        self.started.store(true, Ordering::SeqCst);
        self.compose(&["up", "-d"]).await?;
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        if !self.started.swap(false, Ordering::SeqCst) {
            debug!(project = %self.project, "shutdown skipped, cluster not started");
            return Ok(());
        }

        info!(project = %self.project, "shutting down cluster");
        exec_checked(&self.docker_bin, &self.down_args(), None).await?;
        Ok(())
    }

    async fn is_running(&self) -> Result<bool> {
        let declared = service_set(&self.compose(&["config", "--services"]).await?);
        let running = service_set(
            &self
                .compose(&["ps", "--services", "--status", "running"])
                .await?,
        );
        debug!(?declared, ?running, "cluster status");

        Ok(!declared.is_empty() && declared.is_subset(&running))
    }

    async fn service_logs(
        &self,
        service: &str,
        stopped: bool,
    ) -> Result<String> {
        let id = self.container_id(service, stopped).await?;
        let output = exec(&self.docker_bin, ["logs", id.as_str()], None).await?;
        Ok(output.combined())
    }
}

#[async_trait]
impl CommandRunner for TestCluster {
    async fn run_command_on_service(
        &self,
        service: &str,
        command: &str,
    ) -> Result<String> {
        let output = exec(&self.docker_bin, &self.exec_args(service, command), None).await?;
        if !output.success() {
            debug!(service, code = ?output.code, "service command exited non-zero");
        }
        Ok(output.combined())
    }

    async fn run_with_image(
        &self,
        image: &str,
        command: &str,
        binds: &[Bind],
    ) -> Result<String> {
        self.images.run(image, command, binds).await
    }
}

impl Drop for TestCluster {
    fn drop(&mut self) {
        if !*self.started.get_mut() {
            return;
        }

        warn!(project = %self.project, "cluster dropped while running, tearing down");
        if let Err(e) = std::process::Command::new(&self.docker_bin)
            .args(self.down_args())
            .stdin(std::process::Stdio::null())
            .output()
        {
            warn!(project = %self.project, "teardown on drop failed: {}", e);
        }
    }
}

pub(crate) fn service_set(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn first_line(output: &str) -> Option<&str> {
    output.lines().map(str::trim).find(|l| !l.is_empty())
}
