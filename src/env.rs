//! Environment variable names used by this crate for convenient
//! configuration of the forward endpoint from services.
//!
//! These are purely helpers; the hook types remain decoupled from
//! environment access.

use crate::forward::ForwardConfig;

/// Collector host name or address, e.g. `127.0.0.1`.
pub const FLUENT_HOST_ENV: &str = "FLUENT_HOST";

/// Collector forward port, e.g. `24224`.
pub const FLUENT_PORT_ENV: &str = "FLUENT_PORT";

/// Optional application namespace used during tag resolution.
pub const FLUENT_APP_ENV: &str = "FLUENT_APP";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Build a [`ForwardConfig`] from the environment, falling back to the
/// local collector defaults.
pub fn forward_config_from_env() -> ForwardConfig {
    let defaults = ForwardConfig::default();
    let host = env_or(FLUENT_HOST_ENV, &defaults.host);
    let port = env_or(FLUENT_PORT_ENV, &defaults.port.to_string())
        .parse()
        .unwrap_or(defaults.port);
    ForwardConfig {
        host,
        port,
        connect_timeout: defaults.connect_timeout,
    }
}
