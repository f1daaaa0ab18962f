//! Configuration layer for bulk-relay.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Job file parsing ([`JobFile`], [`JobRequest`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority
//! (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! For required fields without defaults (`notify_url`, `account_url`,
//! the job file path), CLI takes precedence over TOML.
//!
//! The job file itself is a separate TOML document describing exactly
//! one dispatch request; it is never merged with the configuration.

mod cli;
pub mod defaults;
mod error;
mod jobfile;
mod toml;
mod validated;

#[cfg(test)]
mod jobfile_tests;
#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use jobfile::{BotSection, JobFile, JobKind, JobRequest};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
