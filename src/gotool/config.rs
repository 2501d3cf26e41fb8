// Go toolchain configuration

use crate::env::{env_or, parse_env_var};

/// Binaries and streaming behavior for the Go toolchain wrapper.
#[derive(Debug, Clone)]
pub struct GoConfig {
    pub go_bin: String,
    pub lint_bin: String,
    pub fmt_bin: String,
    pub imports_bin: String,
    /// Route child output through the logging sink instead of the terminal.
    pub stream_to_log: bool,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            go_bin: String::from("go"),
            lint_bin: String::from("golangci-lint"),
            fmt_bin: String::from("gofmt"),
            imports_bin: String::from("goimports"),
            stream_to_log: false,
        }
    }
}

impl GoConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = GoConfig::default();

        config.go_bin = env_or("SHIPKIT_GO_BIN", config.go_bin);
        config.lint_bin = env_or("SHIPKIT_GOLANGCI_LINT_BIN", config.lint_bin);
        config.fmt_bin = env_or("SHIPKIT_GOFMT_BIN", config.fmt_bin);
        config.imports_bin = env_or("SHIPKIT_GOIMPORTS_BIN", config.imports_bin);
        config.stream_to_log = parse_env_var("SHIPKIT_STREAM_TO_LOG", config.stream_to_log);

        config
    }
}
