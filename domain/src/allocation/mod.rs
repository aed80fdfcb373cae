//! Batch allocation domain
//!
//! Plans which candidates are judged together. The central promise of this
//! module: every candidate ends up in exactly two distinct batches, one per
//! round, so that each paper receives two judgments from different batch
//! contexts.

pub mod allocator;
pub mod assignment;

pub use allocator::{AllocationError, BatchAllocator};
pub use assignment::{BatchAssignment, BatchId, Round};
