//! Worker configuration rendering against `distributed-config.yml`.

use std::sync::Arc;

use connect_harness::connect_is_healthy;
use connect_harness::ensure_service;
use connect_harness::kafka_ready;
use connect_harness::schema_registry_ready;
use connect_harness::with_cluster;
use connect_harness::zk_ready;
use connect_harness::ClusterLifecycle;
use connect_harness::CommandRunner;
use connect_harness::Result;
use connect_harness::TestCluster;

use crate::common::cluster;
use crate::common::enable_logger;
use crate::common::squash;

const WORKER_PORT: u16 = 8082;

const REQUIRED_SETTINGS: &[(&str, &str)] = &[
    ("failing-config", "CONNECT_BOOTSTRAP_SERVERS"),
    ("failing-config-rest-port", "CONNECT_REST_PORT"),
    ("failing-config-config-topic", "CONNECT_CONFIG_STORAGE_TOPIC"),
    ("failing-config-offset-topic", "CONNECT_OFFSET_STORAGE_TOPIC"),
    ("failing-config-status-topic", "CONNECT_STATUS_STORAGE_TOPIC"),
    ("failing-config-key-converter", "CONNECT_KEY_CONVERTER"),
    ("failing-config-value-converter", "CONNECT_VALUE_CONVERTER"),
    ("failing-config-internal-key-converter", "CONNECT_INTERNAL_KEY_CONVERTER"),
    ("failing-config-internal-value-converter", "CONNECT_INTERNAL_VALUE_CONVERTER"),
    ("failing-config-rest-adv-host-name", "CONNECT_REST_ADVERTISED_HOST_NAME"),
    ("failing-config-zookeeper-connect", "CONNECT_ZOOKEEPER_CONNECT"),
];

const DEFAULT_PROPERTIES: &str = "
    bootstrap.servers=kafka:9092
    rest.port=8082
    rest.advertised.host.name=default-config
    group.id=default
    config.storage.topic=default.config
    offset.storage.topic=default.offsets
    status.storage.topic=default.status
    key.converter=org.apache.kafka.connect.json.JsonConverter
    value.converter=org.apache.kafka.connect.json.JsonConverter
    internal.key.converter=org.apache.kafka.connect.json.JsonConverter
    internal.value.converter=org.apache.kafka.connect.json.JsonConverter
    internal.value.converter.schemas.enable=false
    internal.key.converter.schemas.enable=false
";

const AVRO_PROPERTIES: &str = "
    bootstrap.servers=kafka:9092
    rest.port=8082
    rest.advertised.host.name=default-config
    group.id=default
    config.storage.topic=default.config
    offset.storage.topic=default.offsets
    status.storage.topic=default.status
    key.converter=io.confluent.connect.avro.AvroConverter
    value.converter=io.confluent.connect.avro.AvroConverter
    internal.key.converter=org.apache.kafka.connect.json.JsonConverter
    internal.value.converter=org.apache.kafka.connect.json.JsonConverter
    value.converter.schema.registry.url=http://schema-registry:8081
    internal.value.converter.schemas.enable=false
    key.converter.schema.registry.url=http://schema-registry:8081
    internal.key.converter.schemas.enable=false
";

const DEFAULT_LOG4J: &str = "
    log4j.rootLogger=INFO, stdout
    log4j.appender.stdout=org.apache.log4j.ConsoleAppender
    log4j.appender.stdout.layout=org.apache.log4j.PatternLayout
    log4j.appender.stdout.layout.ConversionPattern=[%d] %p %m (%c)%n
";

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_worker_configuration() {
    enable_logger();

    with_cluster(cluster("config-test", "distributed-config.yml"), |cluster| async move {
        ensure_service(cluster.as_ref(), "zookeeper", &zk_ready("localhost:2181")).await?;
        ensure_service(cluster.as_ref(), "kafka", &kafka_ready(1)).await?;
        ensure_service(
            cluster.as_ref(),
            "schema-registry",
            &schema_registry_ready("schema-registry", 8081),
        )
        .await?;

        required_config_failure(&cluster).await?;
        rendered_file_matches(&cluster, "default-config", "/etc/kafka-connect/kafka-connect.properties", DEFAULT_PROPERTIES).await?;
        rendered_file_matches(&cluster, "default-config-avro", "/etc/kafka-connect/kafka-connect.properties", AVRO_PROPERTIES).await?;
        rendered_file_matches(&cluster, "default-config", "/etc/kafka/connect-log4j.properties", DEFAULT_LOG4J).await?;
        Ok(())
    })
    .await
    .unwrap();
}

async fn required_config_failure(cluster: &Arc<TestCluster>) -> Result<()> {
    for (service, setting) in REQUIRED_SETTINGS {
        let logs = cluster.service_logs(service, true).await?;
        assert!(
            logs.contains(&format!("{setting} is required.")),
            "{service} did not complain about {setting}:\n{logs}"
        );
    }
    Ok(())
}

async fn rendered_file_matches(
    cluster: &Arc<TestCluster>,
    service: &str,
    path: &str,
    expected: &str,
) -> Result<()> {
    let health = connect_is_healthy(cluster.as_ref(), service, WORKER_PORT).await?;
    assert!(health.is_pass(), "{service} is not healthy: {health:?}");

    let rendered = cluster
        .run_command_on_service(service, &format!("cat {path}"))
        .await?;
    assert_eq!(squash(&rendered), squash(expected), "{service}:{path}");
    Ok(())
}
