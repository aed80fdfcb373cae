//! Resolve Conflicts use case
//!
//! Pairs each candidate's two stage-1 judgments, decides which candidates
//! need a third opinion, plans the arbitration batches and merges the
//! outcome into final per-candidate scores.

use tracing::debug;

use triage_domain::{
    merge_final_score, BatchAssignment, BatchId, BatchResult, CandidateSet, ConflictPolicy,
    DetailedScore, PaperScore,
};

/// One candidate's two stage-1 judgments, as far as they survived
#[derive(Debug, Clone)]
pub struct PairedScores {
    /// Position in the candidate pool
    pub position: usize,
    pub candidate_id: String,
    pub score1: Option<DetailedScore>,
    pub score2: Option<DetailedScore>,
    /// The two stage-1 batches that held this candidate
    pub batch_ids: Vec<BatchId>,
}

/// A candidate whose two judgments disagree beyond tolerance
#[derive(Debug, Clone)]
pub struct Conflicted {
    pub position: usize,
    pub candidate_id: String,
    pub score1: DetailedScore,
    pub score2: DetailedScore,
    pub batch_ids: Vec<BatchId>,
}

/// Use case for turning paired judgments into final scores
pub struct ConflictResolver {
    policy: ConflictPolicy,
}

impl ConflictResolver {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    /// Collect each candidate's judgments from the per-batch outcomes.
    ///
    /// `results` must be indexed by batch id, one slot per planned batch.
    pub fn pair_scores(
        candidates: &CandidateSet,
        assignment: &BatchAssignment,
        results: &[BatchResult],
    ) -> Vec<PairedScores> {
        candidates
            .iter()
            .enumerate()
            .map(|(position, candidate)| {
                let [first, second] = assignment.pair_for(position);
                PairedScores {
                    position,
                    candidate_id: candidate.id.clone(),
                    score1: results[first.0].score_for(&candidate.id).copied(),
                    score2: results[second.0].score_for(&candidate.id).copied(),
                    batch_ids: vec![first, second],
                }
            })
            .collect()
    }

    /// Split pairs into settled scores and conflicts needing arbitration.
    ///
    /// - Both judgments close: `Completed` with the mean as final score
    /// - One judgment survived: `Completed` carried by that single judgment
    /// - No judgment survived: `Failed`
    /// - Both survived but disagree: routed to the third round
    pub fn triage(&self, pairs: Vec<PairedScores>) -> (Vec<(usize, PaperScore)>, Vec<Conflicted>) {
        let mut settled = Vec::new();
        let mut conflicted = Vec::new();

        for pair in pairs {
            match (pair.score1, pair.score2) {
                (Some(score1), Some(score2)) if self.policy.is_conflict(&score1, &score2) => {
                    debug!(
                        candidate = %pair.candidate_id,
                        total1 = score1.total,
                        total2 = score2.total,
                        "judgments conflict, scheduling third round"
                    );
                    conflicted.push(Conflicted {
                        position: pair.position,
                        candidate_id: pair.candidate_id,
                        score1,
                        score2,
                        batch_ids: pair.batch_ids,
                    });
                }
                (Some(score1), Some(score2)) => {
                    let final_score = merge_final_score(&score1, &score2, None);
                    settled.push((
                        pair.position,
                        PaperScore::completed(
                            pair.candidate_id,
                            Some(score1),
                            Some(score2),
                            final_score,
                            pair.batch_ids,
                        ),
                    ));
                }
                (Some(score), None) | (None, Some(score)) => {
                    settled.push((
                        pair.position,
                        PaperScore::completed(
                            pair.candidate_id,
                            pair.score1,
                            pair.score2,
                            f64::from(score.total),
                            pair.batch_ids,
                        ),
                    ));
                }
                (None, None) => {
                    settled.push((
                        pair.position,
                        PaperScore::failed(pair.candidate_id, None, None, pair.batch_ids),
                    ));
                }
            }
        }

        (settled, conflicted)
    }

    /// Chunk conflicted candidates into arbitration batches.
    ///
    /// Batch ids continue the stage-1 numbering starting at `next_batch_id`.
    /// Returns `(batch_id, positions into the conflicted slice)` pairs.
    pub fn plan_third_round(
        conflicted: &[Conflicted],
        batch_size: usize,
        next_batch_id: usize,
    ) -> Vec<(BatchId, Vec<usize>)> {
        (0..conflicted.len())
            .collect::<Vec<_>>()
            .chunks(batch_size.max(1))
            .enumerate()
            .map(|(offset, chunk)| (BatchId(next_batch_id + offset), chunk.to_vec()))
            .collect()
    }

    /// Merge a conflicted candidate once its third-round outcome is known.
    ///
    /// A present third judgment settles the conflict by keeping the closest
    /// pair of totals; a missing one (the arbitration batch failed) marks
    /// the candidate `Failed` while retaining both original judgments.
    pub fn merge_with_third(
        &self,
        conflicted: Conflicted,
        third: Option<DetailedScore>,
        third_batch: BatchId,
    ) -> (usize, PaperScore) {
        let mut batch_ids = conflicted.batch_ids;
        batch_ids.push(third_batch);

        let score = match third {
            Some(score3) => {
                let final_score =
                    merge_final_score(&conflicted.score1, &conflicted.score2, Some(&score3));
                PaperScore::arbitrated(
                    conflicted.candidate_id,
                    conflicted.score1,
                    conflicted.score2,
                    score3,
                    final_score,
                    batch_ids,
                )
            }
            None => PaperScore::failed(
                conflicted.candidate_id,
                Some(conflicted.score1),
                Some(conflicted.score2),
                batch_ids,
            ),
        };
        (conflicted.position, score)
    }
}
