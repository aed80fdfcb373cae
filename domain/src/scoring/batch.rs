//! Batch scoring results

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::allocation::BatchId;
use crate::core::Candidate;

use super::score::DetailedScore;

/// One candidate's judgment as produced by a single batch call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub candidate_id: String,
    pub score: DetailedScore,
}

impl ScoredEntry {
    pub fn new(candidate_id: impl Into<String>, score: DetailedScore) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            score,
        }
    }
}

/// Recorded outcome of one batch after all retry attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Which batch this outcome belongs to
    pub batch_id: BatchId,
    /// Judgments produced by the batch, in response order (empty on failure)
    pub entries: Vec<ScoredEntry>,
    /// Whether any attempt produced a valid response
    pub success: bool,
    /// Last error message when every attempt failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock time across all attempts
    pub duration: Duration,
    /// Number of oracle calls spent on this batch
    pub attempts: u32,
}

impl BatchResult {
    /// Record a batch whose response validated
    pub fn succeeded(
        batch_id: BatchId,
        entries: Vec<ScoredEntry>,
        duration: Duration,
        attempts: u32,
    ) -> Self {
        Self {
            batch_id,
            entries,
            success: true,
            error: None,
            duration,
            attempts,
        }
    }

    /// Record a batch that exhausted its attempts
    pub fn exhausted(
        batch_id: BatchId,
        error: impl Into<String>,
        duration: Duration,
        attempts: u32,
    ) -> Self {
        Self {
            batch_id,
            entries: Vec::new(),
            success: false,
            error: Some(error.into()),
            duration,
            attempts,
        }
    }

    /// Judgment for `candidate_id`, if this batch produced one
    pub fn score_for(&self, candidate_id: &str) -> Option<&DetailedScore> {
        self.entries
            .iter()
            .find(|e| e.candidate_id == candidate_id)
            .map(|e| &e.score)
    }
}

/// Score spread within one batch (max minus min total).
///
/// Diagnostic only; spread never changes control flow.
pub fn score_spread(entries: &[ScoredEntry]) -> u32 {
    let totals = entries.iter().map(|e| e.score.total);
    match (totals.clone().min(), totals.max()) {
        (Some(min), Some(max)) => max - min,
        _ => 0,
    }
}

/// The scoring batch as handed to a scorer: the global batch id plus the
/// candidates to judge, in prompt order.
///
/// Owns its candidates so batches can move into concurrent tasks.
#[derive(Debug, Clone)]
pub struct ScoringBatch {
    pub batch_id: BatchId,
    pub candidates: Vec<Candidate>,
}

impl ScoringBatch {
    pub fn new(batch_id: BatchId, candidates: Vec<Candidate>) -> Self {
        Self {
            batch_id,
            candidates,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_lookup_by_candidate() {
        let result = BatchResult::succeeded(
            BatchId(3),
            vec![
                ScoredEntry::new("a", DetailedScore::new(30, 20, 20)),
                ScoredEntry::new("b", DetailedScore::new(10, 10, 10)),
            ],
            Duration::from_millis(120),
            1,
        );
        assert_eq!(result.score_for("b").map(|s| s.total), Some(30));
        assert_eq!(result.score_for("missing"), None);
    }

    #[test]
    fn test_exhausted_batch_has_no_entries() {
        let result = BatchResult::exhausted(BatchId(1), "timeout", Duration::from_secs(9), 3);
        assert!(!result.success);
        assert!(result.entries.is_empty());
        assert_eq!(result.attempts, 3);
        assert_eq!(result.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_spread_over_entries() {
        let entries = vec![
            ScoredEntry::new("a", DetailedScore::new(30, 20, 20)),
            ScoredEntry::new("b", DetailedScore::new(10, 10, 10)),
            ScoredEntry::new("c", DetailedScore::new(20, 15, 15)),
        ];
        assert_eq!(score_spread(&entries), 40);
        assert_eq!(score_spread(&[]), 0);
    }
}
