//! Fixture sanity checks that need no docker daemon.

use std::io::Write;

use connect_harness::HarnessConfig;
use connect_harness::TestCluster;
use serial_test::serial;

use crate::common::fixtures_dir;
use crate::common::harness_config;

const COMPOSE_FILES: &[&str] = &[
    "distributed-config.yml",
    "distributed-single-node.yml",
    "cluster-host-plain.yml",
];

#[test]
fn test_compose_fixtures_exist() {
    for file in COMPOSE_FILES {
        let cluster = TestCluster::new("fixture-check", fixtures_dir(), *file, &harness_config());
        assert!(cluster.compose_path().is_file(), "missing {file}");
    }
}

#[test]
fn test_staged_fixture_dirs_exist() {
    assert!(fixtures_dir().join("jars").is_dir());
    assert!(fixtures_dir().join("sql").join("mysql-test.sql").is_file());
}

#[test]
#[serial]
fn test_harness_toml_selects_fixture() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[cluster]
project = "cluster-test"
compose_file = "cluster-host-plain.yml"

[[cluster.readiness]]
service = "kafka-1"
command = "bash -c 'cub kafka-ready $KAFKA_ZOOKEEPER_CONNECT 3 20 20 10 && echo PASS || echo FAIL'"
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    temp_env::with_vars([("CONFIG_PATH", Some(path.as_str()))], || {
        let config = HarnessConfig::new().unwrap().validate().unwrap();

        assert_eq!(config.cluster.project, "cluster-test");
        assert_eq!(config.cluster.readiness.len(), 1);
        assert_eq!(config.cluster.readiness[0].service, "kafka-1");
    });
}
