//! Candidate value objects
//!
//! A candidate is one paper submitted for ranking. Candidates always travel
//! as a [`CandidateSet`], which validates ids once at the boundary so the
//! rest of the pipeline can index by position without re-checking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single paper submitted for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Caller-supplied identifier, unique within a run (e.g. an arXiv id).
    pub id: String,
    /// Paper title.
    pub title: String,
    /// Paper abstract.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
        }
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// Errors raised while assembling a [`CandidateSet`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateSetError {
    #[error("Candidate set is empty")]
    Empty,

    #[error("Candidate at position {position} has an empty id")]
    EmptyId { position: usize },

    #[error("Duplicate candidate id: {id}")]
    DuplicateId { id: String },
}

/// An ordered, id-validated pool of candidates (Value Object)
///
/// Input order is preserved and significant: ranking breaks score ties by
/// the position a candidate held here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Candidate>", into = "Vec<Candidate>")]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Build a set, rejecting empty input, blank ids and duplicate ids
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, CandidateSetError> {
        if candidates.is_empty() {
            return Err(CandidateSetError::Empty);
        }
        let mut seen = std::collections::HashSet::with_capacity(candidates.len());
        for (position, candidate) in candidates.iter().enumerate() {
            if candidate.id.trim().is_empty() {
                return Err(CandidateSetError::EmptyId { position });
            }
            if !seen.insert(candidate.id.as_str()) {
                return Err(CandidateSetError::DuplicateId {
                    id: candidate.id.clone(),
                });
            }
        }
        Ok(Self { candidates })
    }

    /// Number of candidates in the set
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the set is empty (never true for a validated set)
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate at `position`, if in range
    pub fn get(&self, position: usize) -> Option<&Candidate> {
        self.candidates.get(position)
    }

    /// All candidates in input order
    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Iterate candidates in input order
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Consume the set and return the inner candidates
    pub fn into_inner(self) -> Vec<Candidate> {
        self.candidates
    }
}

impl TryFrom<Vec<Candidate>> for CandidateSet {
    type Error = CandidateSetError;

    fn try_from(candidates: Vec<Candidate>) -> Result<Self, Self::Error> {
        CandidateSet::new(candidates)
    }
}

impl From<CandidateSet> for Vec<Candidate> {
    fn from(set: CandidateSet) -> Self {
        set.candidates
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl std::ops::Index<usize> for CandidateSet {
    type Output = Candidate;

    fn index(&self, position: usize) -> &Self::Output {
        &self.candidates[position]
    }
}
