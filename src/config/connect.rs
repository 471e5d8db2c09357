use serde::Deserialize;
use serde::Serialize;

use super::cluster::invalid;
use crate::Result;

/// Settings for the throw-away containers that talk to the Connect REST API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Image that ships `curl`, `bash` and the Connect CLI tools
    #[serde(default = "default_image")]
    pub image: String,

    /// `docker run --network` value; `host` reaches workers on published ports
    #[serde(default = "default_network_mode")]
    pub network_mode: String,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
            network_mode: default_network_mode(),
        }
    }
}

impl ConnectConfig {
    pub fn validate(&self) -> Result<()> {
        if self.image.trim().is_empty() {
            return Err(invalid("connect.image cannot be empty"));
        }
        if self.network_mode.trim().is_empty() {
            return Err(invalid("connect.network_mode cannot be empty"));
        }
        Ok(())
    }
}

fn default_image() -> String {
    "confluentinc/cp-kafka-connect".to_string()
}
fn default_network_mode() -> String {
    "host".to_string()
}
