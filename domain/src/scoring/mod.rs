//! Scoring domain
//!
//! Everything between "a batch of candidates" and "a ranked list": response
//! parsing, detailed scores, conflict handling, per-run statistics and the
//! final ordering.
//!
//! # Redundant judgment flow
//!
//! ```text
//! batch responses ──> DetailedScore pairs ──> is_conflict? ──> third round
//!                                   │                              │
//!                                   └──────> merge_final_score <───┘
//!                                                   │
//!                                        rank / select_top_n
//! ```

pub mod batch;
pub mod conflict;
pub mod parsing;
pub mod ranking;
pub mod score;
pub mod statistics;

pub use batch::{score_spread, BatchResult, ScoredEntry, ScoringBatch};
pub use conflict::{merge_final_score, ConflictPolicy};
pub use parsing::{
    first_json_object, parse_analysis, parse_batch_scores, AnalysisResponse, BatchScoresResponse,
    ParseError, RawScoreEntry,
};
pub use ranking::{rank, select_top_n};
pub use score::{
    DetailedScore, PaperScore, ScoreRangeError, ScoreStatus, INNOVATION_MAX, PRACTICAL_MAX,
    TECHNICAL_MAX,
};
pub use statistics::{AnalysisStatistics, BatchAttempts, ScoreHistogram};
