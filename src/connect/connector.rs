use std::collections::BTreeMap;

use serde_json::json;
use serde_json::Value;

use crate::constants::ABSENT_RECORD_COUNT;
use crate::constants::CONTAINER_DATA_DIR;

const FILE_SOURCE_CLASS: &str = "org.apache.kafka.connect.file.FileStreamSourceConnector";
const FILE_SINK_CLASS: &str = "org.apache.kafka.connect.file.FileStreamSinkConnector";
const JDBC_SOURCE_CLASS: &str = "io.confluent.connect.jdbc.JdbcSourceConnector";

/// A connector the scenarios create through the worker REST API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorSpec {
    /// Streams lines of `file` into `topic`
    FileSource {
        name: String,
        topic: String,
        file: String,
    },
    /// Appends records of `topics` to `file`
    FileSink {
        name: String,
        topics: String,
        file: String,
    },
    /// Incrementing-mode JDBC source, one topic per table
    JdbcSource {
        name: String,
        connection_url: String,
        topic_prefix: String,
        incrementing_column: String,
        timestamp_column: String,
        poll_interval_ms: u64,
    },
}

impl ConnectorSpec {
    pub fn file_source(
        name: impl Into<String>,
        topic: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        ConnectorSpec::FileSource {
            name: name.into(),
            topic: topic.into(),
            file: file.into(),
        }
    }

    pub fn file_sink(
        name: impl Into<String>,
        topics: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        ConnectorSpec::FileSink {
            name: name.into(),
            topics: topics.into(),
            file: file.into(),
        }
    }

    /// JDBC source keyed on `id`, timestamped by `modified`, polling every second
    pub fn jdbc_source(
        name: impl Into<String>,
        connection_url: impl Into<String>,
        topic_prefix: impl Into<String>,
    ) -> Self {
        ConnectorSpec::JdbcSource {
            name: name.into(),
            connection_url: connection_url.into(),
            topic_prefix: topic_prefix.into(),
            incrementing_column: "id".to_string(),
            timestamp_column: "modified".to_string(),
            poll_interval_ms: 1000,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ConnectorSpec::FileSource { name, .. }
            | ConnectorSpec::FileSink { name, .. }
            | ConnectorSpec::JdbcSource { name, .. } => name,
        }
    }

    /// Connector configuration map of the create request
    pub fn config(&self) -> BTreeMap<&'static str, String> {
        let mut config = BTreeMap::new();
        config.insert("tasks.max", "1".to_string());

        match self {
            ConnectorSpec::FileSource { topic, file, .. } => {
                config.insert("connector.class", FILE_SOURCE_CLASS.to_string());
                config.insert("topic", topic.clone());
                config.insert("file", file.clone());
            }
            ConnectorSpec::FileSink { topics, file, .. } => {
                config.insert("connector.class", FILE_SINK_CLASS.to_string());
                config.insert("topics", topics.clone());
                config.insert("file", file.clone());
            }
            ConnectorSpec::JdbcSource {
                connection_url,
                topic_prefix,
                incrementing_column,
                timestamp_column,
                poll_interval_ms,
                ..
            } => {
                config.insert("connector.class", JDBC_SOURCE_CLASS.to_string());
                config.insert("connection.url", connection_url.clone());
                config.insert("mode", "incrementing".to_string());
                config.insert("incrementing.column.name", incrementing_column.clone());
                config.insert("timestamp.column.name", timestamp_column.clone());
                config.insert("topic.prefix", topic_prefix.clone());
                config.insert("poll.interval.ms", poll_interval_ms.to_string());
            }
        }
        config
    }

    /// `POST /connectors` body
    pub fn request_body(&self) -> Value {
        json!({
            "name": self.name(),
            "config": self.config(),
        })
    }

    /// curl invocation posting [`Self::request_body`] to the worker at `host:port`
    pub fn create_command(
        &self,
        host: &str,
        port: u16,
    ) -> String {
        format!(
            "curl -s -X POST -H \"Content-Type: application/json\" --data {} http://{host}:{port}/connectors",
            shell_quote(&self.request_body().to_string())
        )
    }
}

pub fn status_command(
    host: &str,
    port: u16,
    name: &str,
) -> String {
    format!("curl -s -X GET http://{host}:{port}/connectors/{name}/status")
}

/// Path of `file` inside the helper container's data mount
pub fn container_data_path(file: &str) -> String {
    format!("{CONTAINER_DATA_DIR}/{file}")
}

/// Replaces the mounted text files with `seq n` written to `file`
pub fn seed_file_command(
    file: &str,
    records: u64,
) -> String {
    format!(
        "rm -rf {CONTAINER_DATA_DIR}/*.txt && seq {records} > {}",
        shell_quote(&container_data_path(file))
    )
}

/// Prints the line count of `file`, or the absent sentinel when it does not exist
pub fn record_count_command(file: &str) -> String {
    let path = shell_quote(&container_data_path(file));
    format!("if [ -e {path} ]; then wc -l < {path}; else echo {ABSENT_RECORD_COUNT}; fi")
}

/// Single-quotes `s` for a POSIX shell
pub(crate) fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

