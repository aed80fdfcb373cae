//! Configuration file loading for paper-triage
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./triage.toml` or `./.triage.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/paper-triage/config.toml`
//! 4. Fallback: `~/.config/paper-triage/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConflictConfig, FileOracleConfig, FileOutputConfig,
    FilePipelineConfig, KNOWN_FORMATS,
};
pub use loader::ConfigLoader;
