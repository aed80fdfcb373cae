//! Batch assignment value objects

use serde::{Deserialize, Serialize};

/// Identifier of a single scoring batch, unique across both rounds.
///
/// Ids are dense: first-round batches come first, second-round batches
/// follow, and any arbitration batches continue the numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub usize);

impl BatchId {
    /// Raw index of this batch
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two independent partitions of the candidate pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Round {
    First,
    Second,
}

impl Round {
    /// Zero-based index of the round
    pub fn index(&self) -> usize {
        match self {
            Round::First => 0,
            Round::Second => 1,
        }
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Round::First => write!(f, "round 1"),
            Round::Second => write!(f, "round 2"),
        }
    }
}

/// Complete batch plan for one scoring run (Value Object)
///
/// Candidates are referred to by their position in the originating
/// [`CandidateSet`](crate::core::CandidateSet). Each candidate appears in
/// exactly one batch per round, so its two batch ids are always distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAssignment {
    /// Member candidate positions per batch, indexed by [`BatchId`]
    batches: Vec<Vec<usize>>,
    /// For each candidate position, its `[first_round, second_round]` batches
    pairs: Vec<[BatchId; 2]>,
    /// Batches per round; first-round ids are `0..per_round`
    per_round: usize,
    /// Hard cap on batch membership the allocator promised
    max_batch_size: usize,
}

impl BatchAssignment {
    pub(crate) fn from_parts(
        batches: Vec<Vec<usize>>,
        pairs: Vec<[BatchId; 2]>,
        per_round: usize,
        max_batch_size: usize,
    ) -> Self {
        Self {
            batches,
            pairs,
            per_round,
            max_batch_size,
        }
    }

    /// Total number of batches across both rounds
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Number of candidates covered by the plan
    pub fn candidate_count(&self) -> usize {
        self.pairs.len()
    }

    /// Candidate positions assigned to `batch`
    pub fn members(&self, batch: BatchId) -> &[usize] {
        &self.batches[batch.0]
    }

    /// The two batch ids holding `candidate`
    pub fn pair_for(&self, candidate: usize) -> [BatchId; 2] {
        self.pairs[candidate]
    }

    /// Which round a batch belongs to
    pub fn round_of(&self, batch: BatchId) -> Round {
        if batch.0 < self.per_round {
            Round::First
        } else {
            Round::Second
        }
    }

    /// Upper bound on batch membership
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Iterate `(id, members)` over every batch in id order
    pub fn batches(&self) -> impl Iterator<Item = (BatchId, &[usize])> {
        self.batches
            .iter()
            .enumerate()
            .map(|(i, members)| (BatchId(i), members.as_slice()))
    }

    /// Check the structural guarantees of the plan.
    ///
    /// Returns the list of violations (empty when the plan is sound):
    /// every candidate holds two distinct batch ids, membership lists and
    /// pairs agree, no batch exceeds the size cap, and no batch is empty.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (candidate, pair) in self.pairs.iter().enumerate() {
            if pair[0] == pair[1] {
                violations.push(format!(
                    "candidate {candidate} assigned twice to batch {}",
                    pair[0]
                ));
            }
            for (round, id) in pair.iter().enumerate() {
                match self.batches.get(id.0) {
                    Some(members) if members.contains(&candidate) => {}
                    _ => violations.push(format!(
                        "candidate {candidate} missing from batch {id} (round {})",
                        round + 1
                    )),
                }
            }
        }

        let mut memberships = vec![0usize; self.pairs.len()];
        for (id, members) in self.batches.iter().enumerate() {
            if members.is_empty() {
                violations.push(format!("batch {id} is empty"));
            }
            if members.len() > self.max_batch_size {
                violations.push(format!(
                    "batch {id} holds {} candidates, cap is {}",
                    members.len(),
                    self.max_batch_size
                ));
            }
            for &candidate in members {
                match memberships.get_mut(candidate) {
                    Some(count) => *count += 1,
                    None => violations.push(format!(
                        "batch {id} references unknown candidate {candidate}"
                    )),
                }
            }
        }

        for (candidate, &count) in memberships.iter().enumerate() {
            if count != 2 {
                violations.push(format!(
                    "candidate {candidate} appears in {count} batches, expected 2"
                ));
            }
        }

        violations
    }
}
