//! Report rendering

pub mod console;

pub use console::{ConsoleFormatter, disable_colors};
