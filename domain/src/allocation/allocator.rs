//! Two-round batch allocator
//!
//! Every candidate needs two independently-contexted judgments, so the
//! allocator builds two disjoint partitions ("rounds") of the candidate
//! pool. A candidate lands in exactly one batch per round, which makes its
//! two batch ids distinct by construction.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, warn};

use super::assignment::{BatchAssignment, BatchId};

/// Errors raised by [`BatchAllocator::allocate`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot form at least two batches from {candidates} candidates")]
    InsufficientBatches { candidates: usize },

    #[error("Allocation invariant violated: {0}")]
    InvariantViolation(String),
}

/// Plans scoring batches for a candidate pool.
///
/// The batch count is chosen so the average batch size stays close to the
/// hint, with roughly 20% headroom to absorb uneven splits. Shuffling uses a
/// run-local random source; fixing a seed makes a run reproducible without
/// affecting any other run.
#[derive(Debug, Clone)]
pub struct BatchAllocator {
    batch_size_hint: usize,
    seed: Option<u64>,
}

impl BatchAllocator {
    /// Create an allocator targeting `batch_size_hint` candidates per batch
    pub fn new(batch_size_hint: usize) -> Self {
        Self {
            batch_size_hint,
            seed: None,
        }
    }

    /// Fix the shuffle seed (reproducible runs)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Hard cap on batch membership: the hint plus ~20% headroom
    pub fn size_cap(&self) -> usize {
        self.batch_size_hint + self.batch_size_hint.div_ceil(5)
    }

    /// Batches needed to cover the pool once at close-to-hint sizes
    fn batches_per_round(&self, candidates: usize) -> usize {
        let mut per_round =
            ((candidates + self.batch_size_hint / 2) / self.batch_size_hint).max(1);
        while candidates.div_ceil(per_round) > self.size_cap() {
            per_round += 1;
        }
        per_round
    }

    /// Assign every candidate position in `0..candidate_count` to exactly
    /// one batch per round.
    ///
    /// Within each round the candidate order is shuffled (Fisher-Yates) and
    /// dealt round-robin into that round's batches, so batch contexts differ
    /// between the two judgments of any candidate.
    pub fn allocate(&self, candidate_count: usize) -> Result<BatchAssignment, AllocationError> {
        if self.batch_size_hint == 0 {
            return Err(AllocationError::InvalidInput(
                "batch size hint must be positive".to_string(),
            ));
        }
        if candidate_count == 0 {
            return Err(AllocationError::InvalidInput(
                "candidate pool is empty".to_string(),
            ));
        }

        let per_round = self.batches_per_round(candidate_count);
        let total = per_round * 2;
        if total < 2 {
            return Err(AllocationError::InsufficientBatches {
                candidates: candidate_count,
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut batches: Vec<Vec<usize>> = vec![Vec::new(); total];
        let mut pairs = vec![[BatchId(0); 2]; candidate_count];

        for round in 0..2 {
            let mut order: Vec<usize> = (0..candidate_count).collect();
            order.shuffle(&mut rng);
            for (slot, &candidate) in order.iter().enumerate() {
                let batch = round * per_round + slot % per_round;
                batches[batch].push(candidate);
                pairs[candidate][round] = BatchId(batch);
            }
        }

        Self::repair_duplicates(&mut batches, &mut pairs, self.size_cap())?;

        let assignment = BatchAssignment::from_parts(batches, pairs, per_round, self.size_cap());
        let violations = assignment.invariant_violations();
        if !violations.is_empty() {
            return Err(AllocationError::InvariantViolation(violations.join("; ")));
        }

        debug!(
            candidates = candidate_count,
            batches = total,
            per_round,
            size_cap = self.size_cap(),
            "allocated scoring batches"
        );
        Ok(assignment)
    }

    /// Post-hoc duplicate check. Disjoint round id ranges make duplicates
    /// unreachable from `allocate`, but the plan is re-verified anyway and
    /// any candidate holding the same batch twice is moved to a batch with
    /// spare capacity.
    fn repair_duplicates(
        batches: &mut [Vec<usize>],
        pairs: &mut [[BatchId; 2]],
        size_cap: usize,
    ) -> Result<(), AllocationError> {
        for candidate in 0..pairs.len() {
            let [first, second] = pairs[candidate];
            if first != second {
                continue;
            }
            let target = batches
                .iter()
                .enumerate()
                .find(|(id, members)| {
                    *id != first.0 && members.len() < size_cap && !members.contains(&candidate)
                })
                .map(|(id, _)| id);
            let Some(target) = target else {
                return Err(AllocationError::InvariantViolation(format!(
                    "candidate {candidate} assigned twice to batch {first} and no batch has spare capacity"
                )));
            };
            if let Some(slot) = batches[first.0].iter().rposition(|&c| c == candidate) {
                batches[first.0].remove(slot);
            }
            batches[target].push(candidate);
            pairs[candidate][1] = BatchId(target);
            warn!(candidate, from = %first, to = target, "repaired duplicate batch assignment");
        }
        Ok(())
    }
}
