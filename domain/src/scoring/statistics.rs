//! Run-level statistics
//!
//! The orchestrator never aborts on partial failure; these counters are how
//! the caller learns how much of the requested work actually succeeded.

use serde::{Deserialize, Serialize};

use crate::allocation::BatchId;

use super::batch::BatchResult;
use super::score::{PaperScore, ScoreStatus};

/// Ten-bucket histogram over final scores (0-100, 10-point buckets)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreHistogram {
    buckets: [usize; 10],
}

impl ScoreHistogram {
    /// Count `score` into its 10-point bucket; 100 lands in the top bucket
    pub fn record(&mut self, score: f64) {
        let bucket = ((score / 10.0).floor() as usize).min(9);
        self.buckets[bucket] += 1;
    }

    pub fn buckets(&self) -> &[usize; 10] {
        &self.buckets
    }

    /// Total number of recorded scores
    pub fn total(&self) -> usize {
        self.buckets.iter().sum()
    }

    /// Human-readable range label for bucket `index`
    pub fn bucket_label(index: usize) -> String {
        if index >= 9 {
            "90-100".to_string()
        } else {
            format!("{}-{}", index * 10, index * 10 + 9)
        }
    }
}

/// Attempt bookkeeping for one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAttempts {
    pub batch_id: BatchId,
    pub attempts: u32,
    pub success: bool,
}

/// Aggregate counters for one ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    /// Candidates submitted to the run
    pub total_candidates: usize,
    /// Candidates that received a final score
    pub ranked: usize,
    /// Candidates whose judgments agreed outright
    pub completed: usize,
    /// Candidates resolved through a third judgment
    pub arbitrated: usize,
    /// Candidates excluded from ranking
    pub failed: usize,
    /// Ranked candidates carried by a single surviving judgment
    pub single_score: usize,
    /// Conflicts detected between paired judgments
    pub conflicts: usize,
    /// Batches that exhausted their attempts
    pub failed_batches: Vec<BatchId>,
    /// Attempt counts for every batch issued, stage 1 and arbitration alike
    pub batch_attempts: Vec<BatchAttempts>,
    /// Distribution of final scores
    pub histogram: ScoreHistogram,
    /// Lowest final score, if any candidate ranked
    pub min_score: Option<f64>,
    /// Highest final score, if any candidate ranked
    pub max_score: Option<f64>,
    /// Mean of final scores, if any candidate ranked
    pub mean_score: Option<f64>,
}

impl AnalysisStatistics {
    /// Aggregate counters from the merged scores and per-batch outcomes
    pub fn collect(
        total_candidates: usize,
        scores: &[PaperScore],
        conflicts: usize,
        batches: &[BatchResult],
    ) -> Self {
        let mut stats = Self {
            total_candidates,
            ranked: 0,
            completed: 0,
            arbitrated: 0,
            failed: 0,
            single_score: 0,
            conflicts,
            failed_batches: Vec::new(),
            batch_attempts: Vec::new(),
            histogram: ScoreHistogram::default(),
            min_score: None,
            max_score: None,
            mean_score: None,
        };

        let mut sum = 0.0;
        for score in scores {
            match score.status {
                ScoreStatus::Completed => stats.completed += 1,
                ScoreStatus::ThirdRound => stats.arbitrated += 1,
                ScoreStatus::Failed => stats.failed += 1,
            }
            let Some(value) = score.ranked_score() else {
                continue;
            };
            stats.ranked += 1;
            if score.is_single_score() {
                stats.single_score += 1;
            }
            stats.histogram.record(value);
            sum += value;
            stats.min_score = Some(stats.min_score.map_or(value, |m: f64| m.min(value)));
            stats.max_score = Some(stats.max_score.map_or(value, |m: f64| m.max(value)));
        }
        if stats.ranked > 0 {
            stats.mean_score = Some(sum / stats.ranked as f64);
        }

        for batch in batches {
            if !batch.success {
                stats.failed_batches.push(batch.batch_id);
            }
            stats.batch_attempts.push(BatchAttempts {
                batch_id: batch.batch_id,
                attempts: batch.attempts,
                success: batch.success,
            });
        }
        stats.failed_batches.sort_unstable();
        stats.batch_attempts.sort_unstable_by_key(|b| b.batch_id);

        stats
    }
}
