//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{TomlConfig, default_config_template};

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional
/// TOML config. The function validates all inputs and returns errors for
/// invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Completion webhook URL (required)
    pub notify_url: Url,

    /// Account service base URL (required)
    pub account_url: Url,

    /// Graph API base URL
    pub graph_url: Url,

    /// Graph API version for the messaging endpoint
    pub api_version: String,

    /// Maximum recipients per concurrent batch
    pub batch_size: usize,

    /// Pause between batches
    pub batch_pause: Duration,

    /// Per-request timeout. `None` disables the bound.
    pub send_timeout: Option<Duration>,

    /// Connection pool capacity shared across a job's sends
    pub pool_limit: usize,

    /// Path of the job file to dispatch (required)
    pub job_file: PathBuf,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timeout_str = self
            .send_timeout
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));

        write!(
            f,
            "Config {{ job: {}, graph: {} ({}), batch: {}x/{}ms, timeout: {}, pool: {}, \
             notify: {}, accounts: {} }}",
            self.job_file.display(),
            self.graph_url,
            self.api_version,
            self.batch_size,
            self.batch_pause.as_millis(),
            timeout_str,
            self.pool_limit,
            self.notify_url,
            self.account_url,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional
    /// TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`notify_url`, `account_url`, the job file)
    /// - A URL is invalid
    /// - The batch size is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let notify_url = Self::resolve_notify_url(cli, toml)?;
        let account_url = Self::resolve_account_url(cli, toml)?;
        let graph_url = Self::resolve_graph_url(cli, toml)?;

        let api_version = cli
            .api_version
            .clone()
            .or_else(|| toml.and_then(|t| t.provider.api_version.clone()))
            .unwrap_or_else(|| defaults::API_VERSION.to_string());

        let batch_size = cli
            .batch_size
            .or_else(|| toml.and_then(|t| t.dispatch.batch_size))
            .unwrap_or(defaults::BATCH_SIZE);
        if batch_size == 0 {
            return Err(ConfigError::invalid(
                "batch_size",
                "must be at least 1".to_string(),
            ));
        }

        let batch_pause = Duration::from_millis(
            cli.batch_pause_ms
                .or_else(|| toml.and_then(|t| t.dispatch.batch_pause_ms))
                .unwrap_or(defaults::BATCH_PAUSE_MS),
        );

        let timeout_secs = cli
            .send_timeout
            .or_else(|| toml.and_then(|t| t.provider.send_timeout))
            .unwrap_or(defaults::SEND_TIMEOUT_SECS);
        let send_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let pool_limit = cli
            .pool_limit
            .or_else(|| toml.and_then(|t| t.provider.pool_limit))
            .unwrap_or(defaults::POOL_LIMIT);

        let job_file = cli.job.clone().ok_or(ConfigError::missing(
            field::JOB_FILE,
            "Pass the job file path as the first argument",
        ))?;

        Ok(Self {
            notify_url,
            account_url,
            graph_url,
            api_version,
            batch_size,
            batch_pause,
            send_timeout,
            pool_limit,
            job_file: expand_tilde(&job_file),
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path
    /// (with `~` expanded to the home directory).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(&expand_tilde(path))?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_notify_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let raw = cli
            .notify_url
            .clone()
            .or_else(|| toml.and_then(|t| t.relay.notify_url.clone()))
            .ok_or(ConfigError::missing(
                field::NOTIFY_URL,
                "Use --notify-url or set relay.notify_url in config file",
            ))?;
        parse_url(&raw)
    }

    fn resolve_account_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let raw = cli
            .account_url
            .clone()
            .or_else(|| toml.and_then(|t| t.relay.account_url.clone()))
            .ok_or(ConfigError::missing(
                field::ACCOUNT_URL,
                "Use --account-url or set relay.account_url in config file",
            ))?;
        parse_url(&raw)
    }

    fn resolve_graph_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let raw = cli
            .graph_url
            .clone()
            .or_else(|| toml.and_then(|t| t.provider.graph_url.clone()))
            .unwrap_or_else(|| defaults::GRAPH_URL.to_string());
        parse_url(&raw)
    }
}

/// Parses a URL string into a validated `Url`.
fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Expands a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };
    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// Writes the default configuration template to the given path.
///
/// # Errors
///
/// Returns [`ConfigError::FileWrite`] if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, default_config_template()).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
