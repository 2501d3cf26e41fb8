// Ko configuration

use crate::env::{env_or, parse_env_var};

/// Binary and streaming behavior for the ko wrapper.
#[derive(Debug, Clone)]
pub struct KoConfig {
    pub bin: String,
    /// Route child output through the logging sink instead of the terminal.
    pub stream_to_log: bool,
}

impl Default for KoConfig {
    fn default() -> Self {
        Self {
            bin: String::from("ko"),
            stream_to_log: false,
        }
    }
}

impl KoConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = KoConfig::default();

        config.bin = env_or("SHIPKIT_KO_BIN", config.bin);
        config.stream_to_log = parse_env_var("SHIPKIT_STREAM_TO_LOG", config.stream_to_log);

        config
    }
}
