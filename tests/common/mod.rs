use std::path::Path;
use std::path::PathBuf;

use connect_harness::container_data_path;
use connect_harness::create_connector;
use connect_harness::create_file_source_test_data;
use connect_harness::wait_for_sink_records;
use connect_harness::CommandRunner;
use connect_harness::ConnectorSpec;
use connect_harness::ConnectorState;
use connect_harness::ConnectorStatus;
use connect_harness::HarnessConfig;
use connect_harness::PollOutcome;
use connect_harness::RecordCount;
use connect_harness::Result;
use connect_harness::TestCluster;
use tracing_subscriber::EnvFilter;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for integration test.");
}

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("kafka-connect")
}

pub fn harness_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.cluster.fixtures_dir = fixtures_dir();
    config
}

pub fn cluster(
    project: &str,
    compose_file: &str,
) -> TestCluster {
    TestCluster::new(project, fixtures_dir(), compose_file, &harness_config())
}

/// Removes all whitespace, for comparing rendered property files
pub fn squash(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// One file source feeding one file sink through `topic`
pub struct FileRoundTrip<'a> {
    pub topic: &'a str,
    pub host_dir: &'a str,
    pub source_file: &'a str,
    pub sink_file: &'a str,
    pub source_worker: u16,
    pub sink_worker: u16,
    pub records: u64,
}

impl FileRoundTrip<'_> {
    /// Seeds the source file, creates both connectors and waits for the sink
    /// to hold every record
    pub async fn run<R: CommandRunner + ?Sized>(
        &self,
        runner: &R,
        config: &HarnessConfig,
        source_name: &str,
        sink_name: &str,
    ) -> Result<()> {
        let host_dir = Path::new(self.host_dir);
        create_file_source_test_data(runner, config, host_dir, self.source_file, self.records).await?;

        let source = ConnectorSpec::file_source(source_name, self.topic, container_data_path(self.source_file));
        let outcome = create_connector(runner, config, &source, "localhost", self.source_worker).await?;
        assert_running(source_name, &outcome);

        let sink = ConnectorSpec::file_sink(sink_name, self.topic, container_data_path(self.sink_file));
        let outcome = create_connector(runner, config, &sink, "localhost", self.sink_worker).await?;
        assert_running(sink_name, &outcome);

        let sink_output = wait_for_sink_records(runner, config, host_dir, self.sink_file, self.records).await?;
        assert_eq!(sink_output.last, Some(RecordCount::Observed(self.records)));
        Ok(())
    }
}

pub fn assert_running(
    name: &str,
    outcome: &PollOutcome<ConnectorStatus>,
) {
    assert_eq!(
        outcome.last.as_ref().map(ConnectorStatus::state),
        Some(ConnectorState::Running),
        "connector {name} after {} attempts",
        outcome.attempts
    );
}
