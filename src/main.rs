//! Floating Timer - an always-on-top countdown widget
//!
//! A small borderless window shows the remaining time and a progress ring:
//! - drag it anywhere on screen
//! - adjust its opacity between 30% and 100%
//! - pick a preset length from the menu bar or with the number keys

use anyhow::Result;
use clap::{CommandFactory, Parser};

use floating_timer::app;
use floating_timer::cli::{Cli, Commands};

/// Main entry point
fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli) {
        eprintln!("エラー: {:#}", e);
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence; otherwise `-v` raises the level to debug.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.into_command() {
        Commands::Run(args) => {
            let config = args.to_config();
            tracing::debug!(?config, "タイマーを起動します");
            app::run(config)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
