//! Presentation layer for paper-triage
//!
//! This crate contains CLI definitions, output formatters,
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::{ConsoleFormatter, disable_colors};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
