//! Three-broker, three-worker cluster on the host network
//! (`cluster-host-plain.yml`).

use std::sync::Arc;

use connect_harness::connect_is_healthy;
use connect_harness::create_topics;
use connect_harness::ensure_service;
use connect_harness::kafka_ready;
use connect_harness::with_cluster;
use connect_harness::zk_ready;
use connect_harness::ClusterLifecycle;
use connect_harness::HarnessConfig;
use connect_harness::Result;
use connect_harness::TestCluster;
use connect_harness::TestMachine;

use crate::common::cluster;
use crate::common::enable_logger;
use crate::common::fixtures_dir;
use crate::common::harness_config;
use crate::common::FileRoundTrip;

const MACHINE_DIR: &str = "/tmp/kafka-connect-host-cluster-test";
const DATA_DIR: &str = "/tmp/connect-cluster-host-file-test";

struct WorkerGroup<'a> {
    internal_prefix: &'a str,
    topic: &'a str,
    services: [(&'a str, u16); 3],
    file_tag: &'a str,
}

const JSON_WORKERS: WorkerGroup<'static> = WorkerGroup {
    internal_prefix: "default",
    topic: "cluster-host-file-test",
    services: [("connect-host-1", 28082), ("connect-host-2", 38082), ("connect-host-3", 48082)],
    file_tag: "",
};

const AVRO_WORKERS: WorkerGroup<'static> = WorkerGroup {
    internal_prefix: "default.avro",
    topic: "cluster-host-avro-file-test",
    services: [
        ("connect-host-avro-1", 28083),
        ("connect-host-avro-2", 38083),
        ("connect-host-avro-3", 48083),
    ],
    file_tag: "avro.",
};

#[tokio::test]
#[ignore = "requires docker-machine and DOCKER_MACHINE_NAME"]
async fn test_cluster_on_host_network() {
    enable_logger();
    let config = harness_config();
    let machine = TestMachine::from_env(&config.cluster).unwrap();
    machine.ssh(&format!("mkdir -p {MACHINE_DIR}/jars")).await.unwrap();
    machine
        .scp_to_machine(&fixtures_dir().join("jars"), MACHINE_DIR)
        .await
        .unwrap();

    let result = with_cluster(cluster("cluster-test", "cluster-host-plain.yml"), |cluster| async move {
        ensure_service(
            cluster.as_ref(),
            "zookeeper-1",
            &zk_ready("localhost:22181,localhost:32181,localhost:42181"),
        )
        .await?;
        ensure_service(cluster.as_ref(), "kafka-1", &kafka_ready(3)).await?;

        assert!(cluster.is_running().await?);

        file_connector(&cluster, &config, &JSON_WORKERS).await?;
        file_connector(&cluster, &config, &AVRO_WORKERS).await?;
        Ok(())
    })
    .await;

    machine.ssh(&format!("sudo rm -rf {MACHINE_DIR}")).await.unwrap();
    result.unwrap();
}

/// Source on the first worker, sink on the second: records cross workers
/// through the shared topic
async fn file_connector(
    cluster: &Arc<TestCluster>,
    config: &HarnessConfig,
    group: &WorkerGroup<'_>,
) -> Result<()> {
    create_topics(cluster.as_ref(), "kafka-1", group.internal_prefix, group.topic).await?;
    for (service, port) in group.services {
        let health = connect_is_healthy(cluster.as_ref(), service, port).await?;
        assert!(health.is_pass(), "{service}: {health:?}");
    }

    let source_file = format!("source.{}test.txt", group.file_tag);
    let sink_file = format!("sink.{}test.txt", group.file_tag);
    FileRoundTrip {
        topic: group.topic,
        host_dir: DATA_DIR,
        source_file: &source_file,
        sink_file: &sink_file,
        source_worker: group.services[0].1,
        sink_worker: group.services[1].1,
        records: 10000,
    }
    .run(cluster.as_ref(), config, "cluster-host-source-test", "cluster-host-sink-test")
    .await
}
