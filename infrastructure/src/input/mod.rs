//! Input file adapters

mod candidates;

pub use candidates::{CandidateLoadError, load_candidates};
