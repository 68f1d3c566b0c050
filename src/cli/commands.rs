//! Command definitions for the floating timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::{TimerConfig, DEFAULT_MINUTES, DEFAULT_OPACITY, MAX_OPACITY, MIN_OPACITY};

// ============================================================================
// CLI Structure
// ============================================================================

/// Floating Timer - an always-on-top countdown widget
#[derive(Parser, Debug)]
#[command(
    name = "floating-timer",
    version,
    about = "常に最前面に表示される半透明のカウントダウンタイマー",
    long_about = "枠なしの小さなウィンドウでカウントダウンを表示します。\n\
                  ウィンドウはドラッグで移動でき、不透明度は30%から100%まで調整できます。",
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Options for the default `run` command
    #[command(flatten)]
    pub run: RunArgs,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the command to execute, treating a bare invocation as `run`.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Run(self.run))
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Open the timer window
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Initial duration in minutes (0-999)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_MINUTES,
        value_parser = clap::value_parser!(u32).range(0..=999)
    )]
    pub minutes: u32,

    /// Initial window opacity (0.3-1.0)
    #[arg(short, long, default_value_t = DEFAULT_OPACITY, value_parser = parse_opacity)]
    pub opacity: f64,

    /// Disable the completion sound
    #[arg(long)]
    pub no_sound: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_MINUTES,
            opacity: DEFAULT_OPACITY,
            no_sound: false,
        }
    }
}

impl RunArgs {
    /// Converts the arguments into a timer configuration.
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig::default()
            .with_initial_minutes(self.minutes)
            .with_opacity(self.opacity)
            .with_sound(!self.no_sound)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses an opacity value.
///
/// - Must be a number
/// - Must lie within 0.3-1.0
fn parse_opacity(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("数値を指定してください: {}", s))?;
    if !(MIN_OPACITY..=MAX_OPACITY).contains(&value) {
        return Err(format!(
            "不透明度は{}から{}の範囲で指定してください",
            MIN_OPACITY, MAX_OPACITY
        ));
    }
    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================
