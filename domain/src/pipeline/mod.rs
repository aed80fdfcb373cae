//! Pipeline domain
//!
//! Stage identities and the aggregate result returned to the caller.

pub mod report;
pub mod stage;

pub use report::{RankingReport, StageTimings};
pub use stage::Stage;
