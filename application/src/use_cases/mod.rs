//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod resolve_conflicts;
pub mod run_ranking;
pub mod score_batch;
pub(crate) mod shared;
