//! Infrastructure layer for paper-triage
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod input;
pub mod oracle;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use input::{CandidateLoadError, load_candidates};
pub use oracle::{HttpOracleSettings, HttpScoringOracle};
