//! Presentation layer for segpipe
//!
//! This crate contains CLI definitions and output formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, parse_override};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, RenderError};
