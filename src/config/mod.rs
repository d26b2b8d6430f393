//! Configuration layer for the `whatsapp-api` binary.
//!
//! The library itself is configured at construction time only; this module
//! turns CLI arguments and an optional config file into those constructor
//! arguments.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`Action`])
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
//! Required fields without defaults are `account_id` and `access_token`, plus
//! `verify_token` for `serve`. Empty strings are treated as absent.
//!
//! The webhook options (`--port`, `--app-secret`, `--verify-token`) belong to
//! the `serve` subcommand; other subcommands only pick them up from the
//! config file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{Action, ValidatedConfig, write_default_config};
