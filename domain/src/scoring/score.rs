//! Detailed scores and per-candidate aggregates

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allocation::BatchId;

/// Upper bound of the innovation dimension
pub const INNOVATION_MAX: u32 = 40;
/// Upper bound of the technical-quality dimension
pub const TECHNICAL_MAX: u32 = 30;
/// Upper bound of the practical-value dimension
pub const PRACTICAL_MAX: u32 = 30;

/// A reported subscore fell outside its declared bound
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{dimension} score {value} outside 0..={max}")]
pub struct ScoreRangeError {
    pub dimension: &'static str,
    pub value: i64,
    pub max: u32,
}

/// One oracle judgment of one candidate, split into three bounded dimensions
///
/// The total is always derived from the dimensions; totals reported by the
/// oracle are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedScore {
    /// Novelty of the contribution (0-40)
    pub innovation: u32,
    /// Technical quality and rigor (0-30)
    pub technical: u32,
    /// Practical value of the results (0-30)
    pub practical: u32,
    /// Sum of the three dimensions (0-100)
    pub total: u32,
}

impl DetailedScore {
    /// Create a score with the total recomputed from the dimensions
    pub fn new(innovation: u32, technical: u32, practical: u32) -> Self {
        Self {
            innovation,
            technical,
            practical,
            total: innovation + technical + practical,
        }
    }

    /// Validate raw oracle values against the dimension bounds and build a
    /// score from them. Negative values are out of range, not parse noise.
    pub fn try_from_raw(
        innovation: i64,
        technical: i64,
        practical: i64,
    ) -> Result<Self, ScoreRangeError> {
        let innovation = check_bound("innovation", innovation, INNOVATION_MAX)?;
        let technical = check_bound("technical", technical, TECHNICAL_MAX)?;
        let practical = check_bound("practical", practical, PRACTICAL_MAX)?;
        Ok(Self::new(innovation, technical, practical))
    }
}

fn check_bound(dimension: &'static str, value: i64, max: u32) -> Result<u32, ScoreRangeError> {
    if value < 0 || value > i64::from(max) {
        return Err(ScoreRangeError {
            dimension,
            value,
            max,
        });
    }
    Ok(value as u32)
}

impl std::fmt::Display for DetailedScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (i{}/t{}/p{})",
            self.total, self.innovation, self.technical, self.practical
        )
    }
}

/// Terminal state of one candidate's scoring lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    /// Two judgments agreed (or only one survived); final score stands
    Completed,
    /// Disagreement resolved through a third judgment
    ThirdRound,
    /// Not rankable: both batches failed, or the third round did
    Failed,
}

impl ScoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Completed => "completed",
            ScoreStatus::ThirdRound => "third_round",
            ScoreStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated judgment for one candidate after merging (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperScore {
    /// Id of the candidate this score belongs to
    pub candidate_id: String,
    /// First-round judgment, if that batch succeeded
    pub score1: Option<DetailedScore>,
    /// Second-round judgment, if that batch succeeded
    pub score2: Option<DetailedScore>,
    /// Arbitration judgment, present only after a conflict
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score3: Option<DetailedScore>,
    /// Merged 0-100 score; `None` exactly when the candidate failed
    pub final_score: Option<f64>,
    /// How the candidate left the pipeline
    pub status: ScoreStatus,
    /// Every batch that judged (or was meant to judge) this candidate
    pub batch_ids: Vec<BatchId>,
}

impl PaperScore {
    /// Candidate whose available judgments agreed
    pub fn completed(
        candidate_id: impl Into<String>,
        score1: Option<DetailedScore>,
        score2: Option<DetailedScore>,
        final_score: f64,
        batch_ids: Vec<BatchId>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            score1,
            score2,
            score3: None,
            final_score: Some(final_score),
            status: ScoreStatus::Completed,
            batch_ids,
        }
    }

    /// Candidate resolved through a third judgment
    pub fn arbitrated(
        candidate_id: impl Into<String>,
        score1: DetailedScore,
        score2: DetailedScore,
        score3: DetailedScore,
        final_score: f64,
        batch_ids: Vec<BatchId>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            score1: Some(score1),
            score2: Some(score2),
            score3: Some(score3),
            final_score: Some(final_score),
            status: ScoreStatus::ThirdRound,
            batch_ids,
        }
    }

    /// Candidate that could not be ranked
    pub fn failed(
        candidate_id: impl Into<String>,
        score1: Option<DetailedScore>,
        score2: Option<DetailedScore>,
        batch_ids: Vec<BatchId>,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            score1,
            score2,
            score3: None,
            final_score: None,
            status: ScoreStatus::Failed,
            batch_ids,
        }
    }

    /// Final score if the candidate is rankable
    pub fn ranked_score(&self) -> Option<f64> {
        match self.status {
            ScoreStatus::Failed => None,
            _ => self.final_score,
        }
    }

    /// Whether exactly one of the two round judgments survived
    pub fn is_single_score(&self) -> bool {
        self.score1.is_some() != self.score2.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_recomputed_from_dimensions() {
        let s = DetailedScore::new(35, 25, 20);
        assert_eq!(s.total, 80);
    }

    #[test]
    fn test_raw_values_within_bounds() {
        let s = DetailedScore::try_from_raw(40, 30, 30).unwrap();
        assert_eq!(s.total, 100);
        assert_eq!(DetailedScore::try_from_raw(0, 0, 0).unwrap().total, 0);
    }

    #[test]
    fn test_raw_values_out_of_range() {
        let err = DetailedScore::try_from_raw(41, 10, 10).unwrap_err();
        assert_eq!(err.dimension, "innovation");
        assert_eq!(err.max, 40);

        let err = DetailedScore::try_from_raw(10, -1, 10).unwrap_err();
        assert_eq!(err.dimension, "technical");
        assert_eq!(err.value, -1);

        let err = DetailedScore::try_from_raw(10, 10, 31).unwrap_err();
        assert_eq!(err.dimension, "practical");
    }

    #[test]
    fn test_ranked_score_excludes_failed() {
        let ok = PaperScore::completed("a", Some(DetailedScore::new(30, 20, 20)), None, 70.0, vec![]);
        assert_eq!(ok.ranked_score(), Some(70.0));
        assert!(ok.is_single_score());

        let failed = PaperScore::failed("b", None, None, vec![]);
        assert_eq!(failed.ranked_score(), None);
        assert!(!failed.is_single_score());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ScoreStatus::ThirdRound).unwrap();
        assert_eq!(json, "\"third_round\"");
    }
}
