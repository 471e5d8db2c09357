use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::PollState;
use crate::ProbeError;

/// Lifecycle state reported by `GET /connectors/{name}/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectorState {
    Running,
    Failed,
    Unassigned,
    Paused,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkerState {
    pub state: ConnectorState,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskStatus {
    pub id: u32,
    pub state: ConnectorState,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub trace: Option<String>,
}

/// Decoded status payload of a connector
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectorStatus {
    #[serde(default)]
    pub name: String,
    pub connector: WorkerState,
    #[serde(default)]
    pub tasks: Vec<TaskStatus>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ConnectorStatus {
    pub fn state(&self) -> ConnectorState {
        self.connector.state
    }
}

/// Decodes the output of a status request.
///
/// Anything printed around the JSON object (pull progress from the helper
/// container, trailing newlines) is ignored.
///
/// # Errors
/// - [`ProbeError::Api`] when the worker answered with an `error_code` body,
///   typically 404 while the connector is still being created
/// - [`ProbeError::MalformedPayload`] when no status object can be decoded
pub fn parse_connector_status(output: &str) -> std::result::Result<ConnectorStatus, ProbeError> {
    let body = json_object_slice(output).unwrap_or(output.trim());

    let value: Value =
        serde_json::from_str(body).map_err(|source| ProbeError::MalformedPayload {
            output: output.to_string(),
            source,
        })?;

    if let Some(code) = value.get("error_code") {
        return Err(ProbeError::Api {
            code: code.as_i64().unwrap_or_default(),
            message: value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }

    serde_json::from_value(value).map_err(|source| ProbeError::MalformedPayload {
        output: output.to_string(),
        source,
    })
}

/// `RUNNING` converges, `FAILED` is final, everything else keeps polling
pub fn classify_connector_status(status: &ConnectorStatus) -> PollState {
    match status.state() {
        ConnectorState::Running => PollState::TerminalSuccess,
        ConnectorState::Failed => PollState::TerminalFailure,
        ConnectorState::Unassigned | ConnectorState::Paused | ConnectorState::Unknown => {
            PollState::Pending
        }
    }
}

fn json_object_slice(output: &str) -> Option<&str> {
    let start = output.find('{')?;
    let end = output.rfind('}')?;
    (start < end).then(|| &output[start..=end])
}
