//! yopass-webhook: secret-sharing event notifier
//!
//! Entry point for the yopass-webhook application.

use std::process::ExitCode;

use yopass_webhook::config::{Cli, Command, SendArgs, ValidatedConfig, write_default_config};

mod app;
mod run;

use app::{exit_code, print_config_hint, print_run_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let args = match &cli.command {
        Command::Init { output } => return handle_init(output),
        Command::Send(args) => args.clone(),
    };

    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    tracing::info!("{config}");

    send(&config, args)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `send` subcommand.
///
/// Excluded from coverage - performs real network I/O.
#[cfg(not(tarpaulin_include))]
fn send(config: &ValidatedConfig, args: SendArgs) -> ExitCode {
    match run::run(config, args) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            print_run_hint(&e);
            if e.is_configuration() {
                exit_code::CONFIG_ERROR
            } else {
                exit_code::runtime_error()
            }
        }
    }
}
