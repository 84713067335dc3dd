//! Terraform execution configuration.

use std::time::Duration;

use serde::Deserialize;

/// Execution configuration loaded from environment variables.
///
/// Environment variables are prefixed with `TERRAFORM_`:
/// - `TERRAFORM_BINARY_PATH`: Path to the terraform binary
/// - `TERRAFORM_BASE_DIRECTORY`: Base directory for tenant workspaces
/// - `TERRAFORM_DEFAULT_CONFIG`: Inline configuration used when no
///   template artifact exists
/// - `TERRAFORM_BUCKET`: Object storage bucket holding template artifacts
/// - `TERRAFORM_OBJECT_STORE_URL`: Object storage endpoint
/// - `TERRAFORM_LOCK_TTL_SECONDS`: Lock record time-to-live
/// - `TERRAFORM_COMMAND_TIMEOUT_SECONDS`: Per-run subprocess timeout
/// - `TERRAFORM_OPERATION_TIMEOUT_SECONDS`: Overall operation timeout
/// - `TERRAFORM_ALLOWED_COMMANDS`: Comma-separated command allow-list
#[derive(Debug, Clone, Deserialize)]
pub struct TerraformConfig {
    /// Path to the terraform binary
    #[serde(default = "default_binary_path")]
    pub binary_path: String,

    /// Base directory for tenant workspaces
    #[serde(default = "default_base_directory")]
    pub base_directory: String,

    /// Configuration written when no template artifact is available
    #[serde(default = "default_config_body")]
    pub default_config: String,

    /// Object storage bucket holding template artifacts
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Object storage endpoint URL
    #[serde(default = "default_object_store_url")]
    pub object_store_url: String,

    /// Prefix for tenant/template remote-state keys in the rendered
    /// backend configuration
    #[serde(default = "default_state_key_prefix")]
    pub state_key_prefix: String,

    /// Lock record time-to-live in seconds. Must cover the longest
    /// possible run so a live lock is never fenced out from under an
    /// in-progress command.
    #[serde(default = "default_lock_ttl")]
    pub lock_ttl_seconds: u64,

    /// Subprocess wall-clock timeout in seconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,

    /// Overall operation wall-clock timeout in seconds
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_seconds: u64,

    /// Commands accepted by the orchestrator
    #[serde(default = "default_allowed_commands")]
    pub allowed_commands: Vec<String>,

    /// Maximum number of cached per-tenant workspace lock entries
    #[serde(default = "default_max_cached_tenants")]
    pub max_cached_tenants: usize,
}

fn default_binary_path() -> String {
    "terraform".to_string()
}

fn default_base_directory() -> String {
    "/var/lib/terraplane/workspaces".to_string()
}

fn default_config_body() -> String {
    "provider \"null\" {}".to_string()
}

fn default_bucket() -> String {
    "terraplane-templates".to_string()
}

fn default_object_store_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_state_key_prefix() -> String {
    "tfstate".to_string()
}

fn default_lock_ttl() -> u64 {
    1800
}

fn default_command_timeout() -> u64 {
    1500
}

fn default_operation_timeout() -> u64 {
    1800
}

fn default_allowed_commands() -> Vec<String> {
    vec![
        "init".to_string(),
        "plan".to_string(),
        "apply".to_string(),
        "destroy".to_string(),
    ]
}

fn default_max_cached_tenants() -> usize {
    1024
}

impl TerraformConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `TERRAFORM_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("TERRAFORM_").from_env::<TerraformConfig>()
    }

    /// Timeouts must nest: a run is bounded by the operation, and the
    /// operation is bounded by the lock TTL, so an in-progress run can
    /// never outlive its own lock.
    pub fn validate(&self) -> Result<(), String> {
        if self.command_timeout_seconds >= self.operation_timeout_seconds {
            return Err(format!(
                "command timeout ({}s) must be shorter than operation timeout ({}s)",
                self.command_timeout_seconds, self.operation_timeout_seconds
            ));
        }
        if self.operation_timeout_seconds > self.lock_ttl_seconds {
            return Err(format!(
                "operation timeout ({}s) must not exceed lock TTL ({}s)",
                self.operation_timeout_seconds, self.lock_ttl_seconds
            ));
        }
        Ok(())
    }

    /// Per-run subprocess timeout.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_seconds)
    }

    /// Overall operation timeout.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_seconds)
    }
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
            base_directory: default_base_directory(),
            default_config: default_config_body(),
            bucket: default_bucket(),
            object_store_url: default_object_store_url(),
            state_key_prefix: default_state_key_prefix(),
            lock_ttl_seconds: default_lock_ttl(),
            command_timeout_seconds: default_command_timeout(),
            operation_timeout_seconds: default_operation_timeout(),
            allowed_commands: default_allowed_commands(),
            max_cached_tenants: default_max_cached_tenants(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TerraformConfig::default();
        assert_eq!(config.binary_path, "terraform");
        assert_eq!(config.default_config, "provider \"null\" {}");
        assert_eq!(config.lock_ttl_seconds, 1800);
        assert_eq!(config.allowed_commands.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_timeouts() {
        let mut config = TerraformConfig::default();
        config.command_timeout_seconds = 2000;
        assert!(config.validate().is_err());

        let mut config = TerraformConfig::default();
        config.lock_ttl_seconds = 60;
        assert!(config.validate().is_err());
    }
}
