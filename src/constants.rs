// -
// Command output conventions

/// Token a fixture command prints when its check succeeded
pub const PASS_TOKEN: &str = "PASS";

/// Printed by the record-count probe when the sink file does not exist yet
pub const ABSENT_RECORD_COUNT: i64 = -1;

// -
// Environment

/// Names the docker-machine host the clusters run on
pub const DOCKER_MACHINE_NAME_ENV: &str = "DOCKER_MACHINE_NAME";

/// Layered config file path
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Prefix of environment overrides, e.g. `HARNESS__POLL__RECORD_COUNT__MAX_ATTEMPTS`
pub(crate) const ENV_PREFIX: &str = "HARNESS";
pub(crate) const ENV_SEPARATOR: &str = "__";

// -
// Connect REST

/// Default container path bind-mounted for file source/sink data
pub const CONTAINER_DATA_DIR: &str = "/tmp/test";
