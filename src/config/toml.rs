//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Relay endpoints section
    #[serde(default)]
    pub relay: RelaySection,

    /// Provider API section
    #[serde(default)]
    pub provider: ProviderSection,

    /// Batch dispatch tuning section
    #[serde(default)]
    pub dispatch: DispatchSection,
}

/// Relay endpoints: where completion and validation calls go.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    /// Completion webhook URL
    pub notify_url: Option<String>,

    /// Account service base URL
    pub account_url: Option<String>,
}

/// Provider API configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    /// Graph API base URL
    pub graph_url: Option<String>,

    /// Graph API version for the messaging endpoint
    pub api_version: Option<String>,

    /// Per-request timeout in seconds (0 disables the bound)
    pub send_timeout: Option<u64>,

    /// Connection pool capacity shared across a job's sends
    pub pool_limit: Option<usize>,
}

/// Batch dispatch tuning section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Maximum recipients per concurrent batch
    pub batch_size: Option<usize>,

    /// Pause between batches in milliseconds
    pub batch_pause_ms: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# bulk-relay Configuration File

[relay]
# Completion webhook URL (required)
# notify_url = "https://reports.example.com/notify_user/"

# Account service base URL (required)
# account_url = "https://accounts.example.com"

[provider]
# Graph API base URL (default: https://graph.facebook.com)
# graph_url = "https://graph.facebook.com"

# Graph API version for the messaging endpoint (default: v20.0)
# api_version = "v20.0"

# Per-request timeout in seconds; 0 disables the bound (default: 30)
# send_timeout = 30

# Connection pool capacity shared across a job's sends (default: 1000)
# pool_limit = 1000

[dispatch]
# Maximum recipients per concurrent batch (default: 78)
# batch_size = 78

# Pause between batches in milliseconds (default: 200)
# batch_pause_ms = 200
"#
    .to_string()
}
