//! Score Batch use case
//!
//! Judges one batch of candidates with a single oracle call. Validation is
//! strict and every failure is returned as a typed error; the retry
//! decision belongs to the caller, not to this use case.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use triage_domain::{
    parse_batch_scores, score_spread, DetailedScore, ParseError, PromptTemplate, ScoreRangeError,
    ScoredEntry, ScoringBatch,
};

use crate::ports::oracle::{OracleError, ScoringOracle};

/// Errors that can occur while scoring one batch
#[derive(Error, Debug)]
pub enum ScoreBatchError {
    #[error("Oracle call failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Response parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Score count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Score out of range: {0}")]
    Range(#[from] ScoreRangeError),
}

/// Use case for scoring one batch of candidates
pub struct BatchScorer<O: ScoringOracle + 'static> {
    oracle: Arc<O>,
}

impl<O: ScoringOracle + 'static> Clone for BatchScorer<O> {
    fn clone(&self) -> Self {
        Self {
            oracle: Arc::clone(&self.oracle),
        }
    }
}

impl<O: ScoringOracle + 'static> BatchScorer<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Issue exactly one oracle call for the batch and validate the reply.
    ///
    /// The response must cover every candidate exactly once, identified by
    /// its prompt-local index. Entries for unknown indices are dropped with
    /// a warning; a duplicate index keeps the first occurrence and counts
    /// once. Totals are recomputed from the subscores.
    pub async fn score(&self, batch: &ScoringBatch) -> Result<Vec<ScoredEntry>, ScoreBatchError> {
        let prompt = PromptTemplate::scoring_batch(&batch.candidates);
        let raw = self
            .oracle
            .complete(PromptTemplate::scoring_system(), &prompt)
            .await?;

        let response = parse_batch_scores(&raw)?;

        let mut slots: Vec<Option<ScoredEntry>> = vec![None; batch.len()];
        let mut accepted = 0usize;
        for entry in response.scores {
            let Some(candidate) = batch.candidates.get(entry.index) else {
                warn!(
                    batch = %batch.batch_id,
                    index = entry.index,
                    "dropping score for unknown candidate index"
                );
                continue;
            };
            let score =
                DetailedScore::try_from_raw(entry.innovation, entry.technical, entry.practical)?;
            if slots[entry.index].is_some() {
                warn!(
                    batch = %batch.batch_id,
                    index = entry.index,
                    "duplicate candidate index in response, keeping the first entry"
                );
                continue;
            }
            slots[entry.index] = Some(ScoredEntry::new(&candidate.id, score));
            accepted += 1;
        }

        if accepted != batch.len() {
            return Err(ScoreBatchError::CountMismatch {
                expected: batch.len(),
                actual: accepted,
            });
        }

        let entries: Vec<ScoredEntry> = slots.into_iter().flatten().collect();
        debug!(
            batch = %batch.batch_id,
            candidates = entries.len(),
            spread = score_spread(&entries),
            "batch scored"
        );
        Ok(entries)
    }
}
