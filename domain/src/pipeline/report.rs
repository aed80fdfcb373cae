//! Ranking run results

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::analysis::DetailedAnalysis;
use crate::scoring::{AnalysisStatistics, PaperScore, ScoreStatus};

/// Wall-clock time spent in each stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub allocation: Duration,
    pub scoring: Duration,
    pub arbitration: Duration,
    pub analysis: Duration,
    pub total: Duration,
}

/// Complete result of one two-stage ranking run (Aggregate Root)
///
/// `stage1` holds one entry per candidate: rankable candidates first in
/// rank order, failed candidates after them in input order. The run is
/// considered successful even when parts of it failed; `statistics` tells
/// the caller how much work actually completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    /// Per-candidate merged scores, ranked candidates first
    pub stage1: Vec<PaperScore>,
    /// Deep dives for the selected top candidates
    pub stage2: Vec<DetailedAnalysis>,
    /// Run-level counters and distributions
    pub statistics: AnalysisStatistics,
    /// Stage durations
    pub timings: StageTimings,
}

impl RankingReport {
    pub fn new(
        stage1: Vec<PaperScore>,
        stage2: Vec<DetailedAnalysis>,
        statistics: AnalysisStatistics,
        timings: StageTimings,
    ) -> Self {
        Self {
            stage1,
            stage2,
            statistics,
            timings,
        }
    }

    /// Rankable candidates in rank order
    pub fn ranked(&self) -> impl Iterator<Item = &PaperScore> {
        self.stage1
            .iter()
            .filter(|s| s.status != ScoreStatus::Failed)
    }

    /// Candidates excluded from the ranking
    pub fn failed(&self) -> impl Iterator<Item = &PaperScore> {
        self.stage1
            .iter()
            .filter(|s| s.status == ScoreStatus::Failed)
    }

    /// Deep dive for `candidate_id`, if stage 2 produced one
    pub fn analysis_for(&self, candidate_id: &str) -> Option<&DetailedAnalysis> {
        self.stage2.iter().find(|a| a.candidate_id == candidate_id)
    }
}
