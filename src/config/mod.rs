//! Configuration layer for the yopass-webhook binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`SendArgs`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The webhook URL has no default. When neither source provides one, or the
//! value is empty, delivery is disabled and every `send` reports the
//! destination as not configured.
//!
//! # Retry Policy
//!
//! The library's policy is three attempts with a linear 1s base delay. The
//! binary lets both values be overridden (`--retry-max`, `--retry-delay`,
//! or the `[retry]` section); the backoff stays linear.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, SendArgs};
pub use error::ConfigError;
pub use self::toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
