//! Pipeline stage identities

use serde::{Deserialize, Serialize};

/// Stage of a ranking run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Batch planning - every candidate is assigned its two batches
    Allocation,
    /// Stage 1 - parallel batch scoring across both rounds
    Scoring,
    /// Third round - conflicting candidates re-scored once more
    Arbitration,
    /// Stage 2 - parallel per-candidate deep dives for the top N
    Analysis,
}
