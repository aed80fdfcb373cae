//! Application layer for paper-triage
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PipelineConfig, RetryPolicy};
pub use ports::{
    oracle::{OracleError, ScoringOracle},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::resolve_conflicts::{ConflictResolver, Conflicted, PairedScores};
pub use use_cases::run_ranking::{RunRankingError, RunRankingInput, RunRankingUseCase};
pub use use_cases::score_batch::{BatchScorer, ScoreBatchError};
