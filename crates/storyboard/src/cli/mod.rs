//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyboard binary.

mod artifacts;
mod commands;
mod generate;
mod run;
mod session;

pub use commands::{Cli, Commands};
pub use generate::{analyze, extract, image, speech};
pub use run::{RunOptions, run_pipeline};
pub use session::Session;

/// Result type for command handlers.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;
