use std::path::Path;
use std::sync::Arc;

use connect_harness::ensure_service;
use connect_harness::utils::file_io::open_file_for_append;
use connect_harness::with_cluster;
use connect_harness::ClusterLifecycle;
use connect_harness::Error;
use connect_harness::HarnessConfig;
use connect_harness::HarnessError;
use connect_harness::ReadinessCheck;
use connect_harness::Result;
use connect_harness::TestCluster;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let config = HarnessConfig::new()?.validate()?;

    // Initializing Logs
    let _guard = init_observability(&config.log_dir)?;
    info!(?config, "configuration loaded");

    let cluster = TestCluster::from_config(&config);
    let checks = config.cluster.readiness.clone();

    let result = with_cluster(cluster, |cluster| async move {
        run_readiness_checks(&cluster, &checks).await?;
        info!("Topology ready. Waiting for CTRL+C signal...");
        wait_for_shutdown_signal().await
    })
    .await;

    if let Err(e) = &result {
        error!("harness stopped: {}", e);
    }

    println!("Exiting program.");
    result
}

async fn run_readiness_checks(
    cluster: &Arc<TestCluster>,
    checks: &[ReadinessCheck],
) -> Result<()> {
    for check in checks {
        if let Err(e) = ensure_service(cluster.as_ref(), &check.service, &check.command).await {
            if let Error::Harness(HarnessError::CheckFailed { service, .. }) = &e {
                match cluster.service_logs(service, true).await {
                    Ok(logs) => warn!(service = %service, "service logs:\n{}", logs),
                    Err(log_err) => warn!(service = %service, "no logs available: {}", log_err),
                }
            }
            return Err(e);
        }
        info!(service = %check.service, "readiness check passed");
    }
    Ok(())
}

async fn wait_for_shutdown_signal() -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }
    Ok(())
}

pub fn init_observability(log_dir: &Path) -> Result<WorkerGuard> {
    let log_file = open_file_for_append(&log_dir.join("harness.log"))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();

    Ok(guard)
}
