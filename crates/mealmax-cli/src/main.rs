//! # mealmax-cli
//!
//! Binary entry point for the MealMax smoke runner.
//!
//! This crate provides:
//! - CLI argument parsing using `clap`
//! - Logging setup (stderr, `RUST_LOG` aware)
//! - Configuration resolution and validation before any request is sent
//! - Mapping of the run outcome to the process exit code

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use mealmax_smoke::{SmokeConfig, SmokeRunner};
use std::io::{IsTerminal, stdout};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code for usage errors, failed steps and invalid configuration.
const EXIT_FAILURE: i32 = 1;

/// MealMax smoke runner - scripted end-to-end checks for the meal battle API
///
/// The base URL defaults to http://localhost:5000/api and can be changed with
/// MEALMAX_BASE_URL or a mealmax-smoke.yml config file (path overridable with
/// MEALMAX_SMOKE_CONFIG).
#[derive(Parser, Debug)]
#[command(name = "mealmax-smoke", version, about)]
struct Cli {
    /// Print the full JSON body after each successful read step
    #[arg(long)]
    echo_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print().context("Failed to print usage")?;
            return Ok(());
        }
        Err(e) => {
            // Usage errors exit 1 like step failures, never clap's default 2.
            // A failed write to stderr cannot be reported anywhere else.
            e.print().ok();
            std::process::exit(EXIT_FAILURE);
        }
    };

    // Initialize logging; stdout is reserved for progress lines
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = SmokeConfig::load().context("Failed to load smoke configuration")?;
    if cli.echo_json {
        config.echo_json = true;
    }

    let warnings = config
        .validate()
        .context("Configuration validation failed")?;
    for warning in &warnings {
        eprintln!("{warning}");
    }

    debug!(
        base_url = %config.base_url,
        echo_json = config.echo_json,
        "Configuration resolved"
    );

    let runner = SmokeRunner::http(config)
        .context("Failed to create HTTP runner")?
        .with_colors(stdout().is_terminal());

    let report = runner
        .run(&mut stdout())
        .await
        .context("Failed to write progress output")?;

    // Use explicit exit for non-zero codes to ensure proper exit status
    let exit_code = report.exit_code();
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_echo_json_defaults_off() {
        let cli = Cli::try_parse_from(["mealmax-smoke"]).unwrap();
        assert!(!cli.echo_json);
    }

    #[test]
    fn test_echo_json_flag() {
        let cli = Cli::try_parse_from(["mealmax-smoke", "--echo-json"]).unwrap();
        assert!(cli.echo_json);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = Cli::try_parse_from(["mealmax-smoke", "--retry"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_positional_argument_rejected() {
        let err = Cli::try_parse_from(["mealmax-smoke", "http://localhost:5000/api"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
