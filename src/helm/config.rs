// Helm configuration

use crate::env::{env_or, parse_env_var};

/// Binary and streaming behavior for the Helm wrapper.
#[derive(Debug, Clone)]
pub struct HelmConfig {
    pub bin: String,
    /// Route child output through the logging sink instead of the terminal.
    pub stream_to_log: bool,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            bin: String::from("helm"),
            stream_to_log: false,
        }
    }
}

impl HelmConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = HelmConfig::default();

        config.bin = env_or("SHIPKIT_HELM_BIN", config.bin);
        config.stream_to_log = parse_env_var("SHIPKIT_STREAM_TO_LOG", config.stream_to_log);

        config
    }
}
