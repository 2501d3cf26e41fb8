// Environment variable helpers shared by the module configs

use tracing::warn;

/// Read a string env var, falling back to `default` when unset or empty.
pub fn env_or(name: &str, default: String) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// Parse an environment variable, logging a warning if the value is present
/// but invalid.
pub fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %value, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}
