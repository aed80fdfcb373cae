//! Domain layer for paper-triage
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Redundant judgment
//!
//! LLM paper scores are noisy, so no single judgment is trusted:
//!
//! - **Two rounds**: every candidate is scored in two batches with
//!   different batch contexts
//! - **Arbitration**: judgments that disagree beyond tolerance get a third
//!   opinion, and the closest pair of totals wins
//!
//! ## Partial failure tolerance
//!
//! A batch that exhausts its retries only affects its own candidates; the
//! run always completes and reports what failed through statistics.

pub mod allocation;
pub mod analysis;
pub mod core;
pub mod pipeline;
pub mod prompt;
pub mod scoring;
pub mod util;

// Re-export commonly used types
pub use allocation::{AllocationError, BatchAllocator, BatchAssignment, BatchId, Round};
pub use analysis::DetailedAnalysis;
pub use core::{Candidate, CandidateSet, CandidateSetError};
pub use pipeline::{RankingReport, Stage, StageTimings};
pub use prompt::PromptTemplate;
pub use scoring::{
    merge_final_score, parse_analysis, parse_batch_scores, rank, score_spread, select_top_n,
    AnalysisStatistics, BatchAttempts, BatchResult, ConflictPolicy, DetailedScore, PaperScore,
    ParseError, RawScoreEntry, ScoreHistogram, ScoreRangeError, ScoreStatus, ScoredEntry,
    ScoringBatch,
};
