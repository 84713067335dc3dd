//! Application configuration for the Terraplane server.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `TERRAPLANE_`:
/// - `TERRAPLANE_HOST`: Server bind address (default: "0.0.0.0")
/// - `TERRAPLANE_PORT`: Server port (default: 8086)
/// - `TERRAPLANE_SERVER_NAME`: Server name for identification
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server name for identification
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_server_name() -> String {
    "terraplane-server".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `TERRAPLANE_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("TERRAPLANE_").from_env::<AppConfig>()
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            server_name: default_server_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8086);
        assert_eq!(config.server_name, "terraplane-server");
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8086");
    }
}
