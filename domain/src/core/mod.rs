//! Core domain concepts shared across all subdomains.
//!
//! - [`candidate::Candidate`] — one paper submitted for ranking
//! - [`candidate::CandidateSet`] — the validated, ordered candidate pool

pub mod candidate;

pub use candidate::{Candidate, CandidateSet, CandidateSetError};
