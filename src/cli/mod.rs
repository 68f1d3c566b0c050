//! CLI module for the floating timer.
//!
//! - `commands`: Command definitions using clap derive

pub mod commands;

pub use commands::{Cli, Commands, RunArgs};
