//! Application startup and utilities.
//!
//! Exit codes, tracing setup, and hints for configuration errors.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use whatsapp_api::config::{ConfigError, field};

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, missing required fields, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - bind failure, API error, unreadable media, etc.
    ///
    /// `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

const INIT_HINT: &str = "\nRun 'whatsapp-api init' to generate a configuration template.";

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequired { field: f, .. } => {
            if *f == field::COMMAND {
                eprintln!("\nRun 'whatsapp-api --help' to list the available commands.");
            } else if [field::ACCOUNT_ID, field::ACCESS_TOKEN, field::VERIFY_TOKEN].contains(f) {
                eprintln!("{INIT_HINT}");
            }
        }
        ConfigError::FileRead { .. } => eprintln!("{INIT_HINT}"),
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
