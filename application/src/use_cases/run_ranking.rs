//! Run Ranking use case
//!
//! Orchestrates the full two-stage ranking flow: allocate batches, score
//! them in parallel, arbitrate conflicts, rank, then deep-dive the top
//! candidates. Partial failures degrade into statistics; only invalid
//! input or cancellation abort the run.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use triage_domain::{
    parse_analysis, rank, select_top_n, AllocationError, AnalysisStatistics, BatchAllocator,
    BatchAssignment, BatchId, BatchResult, Candidate, CandidateSet, DetailedAnalysis, PaperScore,
    PromptTemplate, RankingReport, ScoringBatch, Stage, StageTimings,
};

use crate::config::{PipelineConfig, RetryPolicy};
use crate::ports::oracle::ScoringOracle;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::resolve_conflicts::{ConflictResolver, Conflicted};
use crate::use_cases::score_batch::BatchScorer;
use crate::use_cases::shared::{check_cancelled, with_cancellation};

/// Errors that can occur during a ranking run
#[derive(Error, Debug)]
pub enum RunRankingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Batch allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Input for the RunRanking use case
#[derive(Debug, Clone)]
pub struct RunRankingInput {
    /// Papers to rank
    pub candidates: CandidateSet,
    /// Run configuration
    pub config: PipelineConfig,
    /// Cooperative cancellation; absent means "run to completion"
    pub cancellation_token: Option<CancellationToken>,
}

impl RunRankingInput {
    pub fn new(candidates: CandidateSet) -> Self {
        Self {
            candidates,
            config: PipelineConfig::default(),
            cancellation_token: None,
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

/// Use case for running the two-stage ranking pipeline
pub struct RunRankingUseCase<O: ScoringOracle + 'static> {
    oracle: Arc<O>,
}

impl<O: ScoringOracle + 'static> RunRankingUseCase<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunRankingInput) -> Result<RankingReport, RunRankingError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunRankingInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RankingReport, RunRankingError> {
        input
            .config
            .validate()
            .map_err(RunRankingError::InvalidInput)?;

        let run_started = Instant::now();
        let mut timings = StageTimings::default();

        info!(
            candidates = input.candidates.len(),
            batch_size = input.config.batch_size,
            top_n = input.config.top_n,
            "starting ranking run"
        );

        // Allocation
        let stage_started = Instant::now();
        let mut allocator = BatchAllocator::new(input.config.batch_size);
        if let Some(seed) = input.config.seed {
            allocator = allocator.with_seed(seed);
        }
        let assignment = allocator.allocate(input.candidates.len())?;
        timings.allocation = stage_started.elapsed();

        let scorer = BatchScorer::new(Arc::clone(&self.oracle));

        // Stage 1: score every batch in parallel
        let stage_started = Instant::now();
        let stage1_results = self
            .stage_scoring(&input, &assignment, &scorer, progress)
            .await?;
        timings.scoring = stage_started.elapsed();

        // Pair up judgments and detect conflicts
        let resolver = ConflictResolver::new(input.config.conflicts);
        let pairs = ConflictResolver::pair_scores(&input.candidates, &assignment, &stage1_results);
        let (settled, conflicted) = resolver.triage(pairs);
        let conflict_count = conflicted.len();

        // Third round for conflicting candidates
        let stage_started = Instant::now();
        let (arbitrated, third_results) = self
            .stage_arbitration(
                &input,
                &resolver,
                conflicted,
                assignment.batch_count(),
                &scorer,
                progress,
            )
            .await?;
        timings.arbitration = stage_started.elapsed();

        // Final scores in candidate input order. Triage and arbitration
        // together cover every candidate exactly once.
        let mut by_position: Vec<Option<PaperScore>> = vec![None; input.candidates.len()];
        for (position, score) in settled.into_iter().chain(arbitrated) {
            by_position[position] = Some(score);
        }
        let scores: Vec<PaperScore> = by_position.into_iter().flatten().collect();

        // Selection
        let ranked_positions = rank(&scores);
        let selected = select_top_n(&scores, input.config.top_n);

        // Stage 2: deep-dive the selected candidates
        let stage_started = Instant::now();
        let stage2 = self.stage_analysis(&input, &selected, progress).await?;
        timings.analysis = stage_started.elapsed();

        // Aggregate
        let mut batch_outcomes = stage1_results;
        batch_outcomes.extend(third_results);
        let statistics = AnalysisStatistics::collect(
            input.candidates.len(),
            &scores,
            conflict_count,
            &batch_outcomes,
        );

        // Report order: ranked candidates first, failures after them
        let mut leftovers: Vec<Option<PaperScore>> = scores.into_iter().map(Some).collect();
        let mut stage1 = Vec::with_capacity(leftovers.len());
        for &position in &ranked_positions {
            if let Some(score) = leftovers[position].take() {
                stage1.push(score);
            }
        }
        stage1.extend(leftovers.into_iter().flatten());

        timings.total = run_started.elapsed();
        info!(
            ranked = statistics.ranked,
            failed = statistics.failed,
            conflicts = statistics.conflicts,
            analyses = stage2.len(),
            elapsed_ms = timings.total.as_millis() as u64,
            "ranking run finished"
        );

        Ok(RankingReport::new(stage1, stage2, statistics, timings))
    }

    /// Stage 1: one concurrent task per batch, joined in full before merging
    async fn stage_scoring(
        &self,
        input: &RunRankingInput,
        assignment: &BatchAssignment,
        scorer: &BatchScorer<O>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<BatchResult>, RunRankingError> {
        check_cancelled(&input.cancellation_token)?;
        info!(batches = assignment.batch_count(), "stage 1: batch scoring");
        progress.on_stage_start(&Stage::Scoring, assignment.batch_count());

        let retry = input.config.retry_policy();
        let mut join_set = JoinSet::new();
        for (batch_id, members) in assignment.batches() {
            let batch = ScoringBatch::new(
                batch_id,
                members.iter().map(|&p| input.candidates[p].clone()).collect(),
            );
            join_set.spawn(Self::score_with_retry(
                scorer.clone(),
                batch,
                retry,
                input.cancellation_token.clone(),
            ));
        }

        let mut slots: Vec<Option<BatchResult>> = vec![None; assignment.batch_count()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(result)) => {
                    progress.on_task_complete(
                        &Stage::Scoring,
                        &format!("batch {}", result.batch_id),
                        result.success,
                    );
                    let slot = result.batch_id.0;
                    slots[slot] = Some(result);
                }
                Ok(Err(e)) => {
                    join_set.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
        progress.on_stage_complete(&Stage::Scoring);

        // A joined-with-error task leaves its slot empty; record it as an
        // exhausted batch so its candidates degrade instead of vanishing.
        let results = slots
            .into_iter()
            .enumerate()
            .map(|(id, slot)| {
                slot.unwrap_or_else(|| {
                    BatchResult::exhausted(
                        BatchId(id),
                        "task aborted before producing a result",
                        Duration::ZERO,
                        0,
                    )
                })
            })
            .collect();
        Ok(results)
    }

    /// Third round: re-score conflicting candidates exactly once more
    async fn stage_arbitration(
        &self,
        input: &RunRankingInput,
        resolver: &ConflictResolver,
        conflicted: Vec<Conflicted>,
        next_batch_id: usize,
        scorer: &BatchScorer<O>,
        progress: &dyn ProgressNotifier,
    ) -> Result<(Vec<(usize, PaperScore)>, Vec<BatchResult>), RunRankingError> {
        if conflicted.is_empty() {
            debug!("no conflicts detected, skipping arbitration");
            return Ok((Vec::new(), Vec::new()));
        }
        check_cancelled(&input.cancellation_token)?;

        let plan = ConflictResolver::plan_third_round(
            &conflicted,
            input.config.third_round_batch_size,
            next_batch_id,
        );
        info!(
            candidates = conflicted.len(),
            batches = plan.len(),
            "third round: conflict arbitration"
        );
        progress.on_stage_start(&Stage::Arbitration, plan.len());

        let retry = input.config.retry_policy();
        let mut join_set = JoinSet::new();
        for (batch_id, indices) in &plan {
            let batch = ScoringBatch::new(
                *batch_id,
                indices
                    .iter()
                    .map(|&i| input.candidates[conflicted[i].position].clone())
                    .collect(),
            );
            join_set.spawn(Self::score_with_retry(
                scorer.clone(),
                batch,
                retry,
                input.cancellation_token.clone(),
            ));
        }

        let mut results: Vec<BatchResult> = Vec::with_capacity(plan.len());
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(result)) => {
                    progress.on_task_complete(
                        &Stage::Arbitration,
                        &format!("batch {}", result.batch_id),
                        result.success,
                    );
                    results.push(result);
                }
                Ok(Err(e)) => {
                    join_set.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
        progress.on_stage_complete(&Stage::Arbitration);

        let mut third_batch_of = vec![BatchId(0); conflicted.len()];
        for (batch_id, indices) in &plan {
            for &i in indices {
                third_batch_of[i] = *batch_id;
            }
        }

        let merged = conflicted
            .into_iter()
            .enumerate()
            .map(|(i, conflict)| {
                let batch_id = third_batch_of[i];
                let third = results
                    .iter()
                    .find(|r| r.batch_id == batch_id)
                    .and_then(|r| r.score_for(&conflict.candidate_id))
                    .copied();
                resolver.merge_with_third(conflict, third, batch_id)
            })
            .collect();

        Ok((merged, results))
    }

    /// Stage 2: one concurrent, unbatched oracle call per selected candidate.
    ///
    /// No redundancy here. A failed call omits that candidate from the
    /// stage-2 output; the candidate stays in the ranking either way.
    async fn stage_analysis(
        &self,
        input: &RunRankingInput,
        selected: &[usize],
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<DetailedAnalysis>, RunRankingError> {
        if selected.is_empty() {
            debug!("stage 2 disabled or nothing ranked, skipping analysis");
            return Ok(Vec::new());
        }
        check_cancelled(&input.cancellation_token)?;
        info!(selected = selected.len(), "stage 2: detailed analysis");
        progress.on_stage_start(&Stage::Analysis, selected.len());

        let mut join_set = JoinSet::new();
        for (order, &position) in selected.iter().enumerate() {
            let oracle = Arc::clone(&self.oracle);
            let candidate = input.candidates[position].clone();
            let token = input.cancellation_token.clone();
            join_set.spawn(async move {
                Self::analyze_candidate(&oracle, &candidate, &token)
                    .await
                    .map(|analysis| (order, candidate.id, analysis))
            });
        }

        let mut slots: Vec<Option<DetailedAnalysis>> = vec![None; selected.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok((order, candidate_id, analysis))) => {
                    progress.on_task_complete(
                        &Stage::Analysis,
                        &candidate_id,
                        analysis.is_some(),
                    );
                    slots[order] = analysis;
                }
                Ok(Err(e)) => {
                    join_set.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
        progress.on_stage_complete(&Stage::Analysis);

        Ok(slots.into_iter().flatten().collect())
    }

    /// Score one batch, retrying failed attempts with a fixed delay.
    ///
    /// Always resolves to a `BatchResult`: an exhausted batch is a localized
    /// failure recorded for statistics, never a run-level error. Only
    /// cancellation propagates as `Err`.
    async fn score_with_retry(
        scorer: BatchScorer<O>,
        batch: ScoringBatch,
        policy: RetryPolicy,
        token: Option<CancellationToken>,
    ) -> Result<BatchResult, RunRankingError> {
        let started = Instant::now();
        let mut last_error = String::new();

        for attempt in 1..=policy.max_attempts() {
            check_cancelled(&token)?;
            match with_cancellation(&token, scorer.score(&batch)).await? {
                Ok(entries) => {
                    if attempt > 1 {
                        debug!(batch = %batch.batch_id, attempt, "batch recovered after retry");
                    }
                    return Ok(BatchResult::succeeded(
                        batch.batch_id,
                        entries,
                        started.elapsed(),
                        attempt,
                    ));
                }
                Err(e) => {
                    warn!(
                        batch = %batch.batch_id,
                        attempt,
                        max_attempts = policy.max_attempts(),
                        error = %e,
                        "batch scoring attempt failed"
                    );
                    last_error = e.to_string();
                    if policy.allows_another(attempt) {
                        with_cancellation(&token, sleep(policy.delay())).await?;
                    }
                }
            }
        }

        Ok(BatchResult::exhausted(
            batch.batch_id,
            last_error,
            started.elapsed(),
            policy.max_attempts(),
        ))
    }

    /// Deep-dive one candidate with a single oracle call
    async fn analyze_candidate(
        oracle: &Arc<O>,
        candidate: &Candidate,
        token: &Option<CancellationToken>,
    ) -> Result<Option<DetailedAnalysis>, RunRankingError> {
        check_cancelled(token)?;
        let prompt = PromptTemplate::analysis_request(candidate);
        let raw = match with_cancellation(
            token,
            oracle.complete(PromptTemplate::analysis_system(), &prompt),
        )
        .await?
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(candidate = %candidate.id, error = %e, "analysis call failed, omitting candidate");
                return Ok(None);
            }
        };

        match parse_analysis(&raw) {
            Ok(parsed) => Ok(Some(DetailedAnalysis::new(
                &candidate.id,
                parsed.tags,
                parsed.evaluation,
                parsed.summary,
            ))),
            Err(e) => {
                warn!(candidate = %candidate.id, error = %e, "analysis response unusable, omitting candidate");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::oracle::OracleError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use triage_domain::ScoreStatus;

    /// Scripted oracle keyed by paper title.
    ///
    /// Batch tasks run concurrently, so canned responses cannot be queued
    /// globally; instead each title carries its own sequence of judgments,
    /// consumed in call-arrival order (the last one repeats).
    #[derive(Default)]
    struct ScriptOracle {
        scores: Mutex<HashMap<String, (Vec<(i64, i64, i64)>, usize)>>,
        fail_titles: Vec<String>,
        flaky_titles: Mutex<HashSet<String>>,
        fail_analysis: Vec<String>,
        calls: AtomicUsize,
    }

    impl ScriptOracle {
        fn new() -> Self {
            Self::default()
        }

        fn with_scores(self, title: &str, values: Vec<(i64, i64, i64)>) -> Self {
            self.scores
                .lock()
                .unwrap()
                .insert(title.to_string(), (values, 0));
            self
        }

        /// Every batch containing this title fails, every time
        fn fail_batches_with(mut self, title: &str) -> Self {
            self.fail_titles.push(title.to_string());
            self
        }

        /// The first batch call containing this title fails, later ones work
        fn flaky_once(self, title: &str) -> Self {
            self.flaky_titles.lock().unwrap().insert(title.to_string());
            self
        }

        fn fail_analysis_for(mut self, title: &str) -> Self {
            self.fail_analysis.push(title.to_string());
            self
        }

        fn batch_titles(prompt: &str) -> Vec<(usize, String)> {
            prompt
                .lines()
                .filter_map(|line| {
                    let line = line.strip_prefix('[')?;
                    let (index, title) = line.split_once("] ")?;
                    Some((index.parse().ok()?, title.to_string()))
                })
                .collect()
        }

        fn respond_scoring(&self, prompt: &str) -> Result<String, OracleError> {
            let titles = Self::batch_titles(prompt);

            for (_, title) in &titles {
                if self.fail_titles.contains(title) {
                    return Err(OracleError::RequestFailed(format!(
                        "injected failure for '{title}'"
                    )));
                }
                if self.flaky_titles.lock().unwrap().remove(title) {
                    return Err(OracleError::Timeout);
                }
            }

            let mut scripts = self.scores.lock().unwrap();
            let entries: Vec<serde_json::Value> = titles
                .iter()
                .map(|(index, title)| {
                    let (values, next) = scripts
                        .get_mut(title)
                        .unwrap_or_else(|| panic!("no script for '{title}'"));
                    let (i, t, p) = values[(*next).min(values.len() - 1)];
                    *next += 1;
                    json!({"index": index, "innovation": i, "technical": t, "practical": p})
                })
                .collect();

            Ok(format!("Scores below.\n{}", json!({ "scores": entries })))
        }

        fn respond_analysis(&self, prompt: &str) -> Result<String, OracleError> {
            let title = prompt
                .lines()
                .find_map(|line| line.strip_prefix("Title: "))
                .unwrap_or("unknown");
            if self.fail_analysis.contains(&title.to_string()) {
                return Err(OracleError::RequestFailed(format!(
                    "injected analysis failure for '{title}'"
                )));
            }
            Ok(json!({
                "tags": ["test"],
                "evaluation": format!("Evaluation of {title}"),
                "summary": format!("Summary of {title}"),
            })
            .to_string())
        }
    }

    #[async_trait]
    impl ScoringOracle for ScriptOracle {
        async fn complete(
            &self,
            _system_prompt: &str,
            user_prompt: &str,
        ) -> Result<String, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if user_prompt.starts_with("Score the following") {
                self.respond_scoring(user_prompt)
            } else {
                self.respond_analysis(user_prompt)
            }
        }
    }

    fn pool(titles: &[&str]) -> CandidateSet {
        CandidateSet::new(
            titles
                .iter()
                .map(|t| Candidate::new(format!("id-{t}"), *t, format!("Abstract of {t}")))
                .collect(),
        )
        .unwrap()
    }

    fn fast_config(batch_size: usize) -> PipelineConfig {
        PipelineConfig::default()
            .with_batch_size(batch_size)
            .with_retry_delay(Duration::ZERO)
            .with_seed(42)
    }

    #[tokio::test]
    async fn test_end_to_end_ranks_and_analyzes_top_candidates() {
        let oracle = Arc::new(
            ScriptOracle::new()
                .with_scores("alpha", vec![(10, 5, 5)]) // 20
                .with_scores("beta", vec![(35, 25, 25)]) // 85
                .with_scores("gamma", vec![(20, 15, 15)]) // 50
                .with_scores("delta", vec![(30, 20, 20)]), // 70
        );
        let use_case = RunRankingUseCase::new(Arc::clone(&oracle));
        let input = RunRankingInput::new(pool(&["alpha", "beta", "gamma", "delta"]))
            .with_config(fast_config(4).with_top_n(2));

        let report = use_case.execute(input).await.unwrap();

        let ids: Vec<&str> = report.stage1.iter().map(|s| s.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["id-beta", "id-delta", "id-gamma", "id-alpha"]);
        for score in &report.stage1 {
            assert_eq!(score.status, ScoreStatus::Completed);
            assert_eq!(score.batch_ids, vec![BatchId(0), BatchId(1)]);
            assert!(!score.is_single_score());
        }
        assert_eq!(report.stage1[0].final_score, Some(85.0));

        assert_eq!(report.stage2.len(), 2);
        assert_eq!(report.stage2[0].candidate_id, "id-beta");
        assert_eq!(report.stage2[1].candidate_id, "id-delta");

        let stats = &report.statistics;
        assert_eq!(stats.total_candidates, 4);
        assert_eq!(stats.ranked, 4);
        assert_eq!(stats.completed, 4);
        assert_eq!(stats.conflicts, 0);
        assert!(stats.failed_batches.is_empty());
        assert_eq!(stats.batch_attempts.len(), 2);
        assert_eq!(stats.histogram.total(), 4);
        assert_eq!(stats.min_score, Some(20.0));
        assert_eq!(stats.max_score, Some(85.0));

        assert!(report.timings.total >= report.timings.scoring);
    }

    #[tokio::test]
    async fn test_conflict_goes_to_third_round() {
        let oracle = Arc::new(
            ScriptOracle::new()
                .with_scores("stable", vec![(28, 21, 21)]) // 70 every time
                // 75 and 25 disagree; the third judgment lands on 70
                .with_scores("disputed", vec![(30, 22, 23), (10, 7, 8), (28, 21, 21)]),
        );
        let use_case = RunRankingUseCase::new(Arc::clone(&oracle));
        let input = RunRankingInput::new(pool(&["stable", "disputed"]))
            .with_config(fast_config(1).with_top_n(0));

        let report = use_case.execute(input).await.unwrap();

        assert_eq!(report.stage1[0].candidate_id, "id-disputed");
        let disputed = &report.stage1[0];
        assert_eq!(disputed.status, ScoreStatus::ThirdRound);
        assert_eq!(disputed.final_score, Some(72.5));
        assert!(disputed.score3.is_some());
        assert_eq!(disputed.batch_ids.len(), 3);
        // Arbitration ids continue after the four stage-1 batches
        assert_eq!(disputed.batch_ids[2], BatchId(4));

        let stable = &report.stage1[1];
        assert_eq!(stable.status, ScoreStatus::Completed);
        assert_eq!(stable.final_score, Some(70.0));

        assert_eq!(report.statistics.conflicts, 1);
        assert_eq!(report.statistics.arbitrated, 1);
        assert!(report.stage2.is_empty(), "top_n=0 must disable stage 2");
    }

    #[tokio::test]
    async fn test_exhausted_batches_only_drop_their_candidates() {
        let oracle = Arc::new(
            ScriptOracle::new()
                .with_scores("good", vec![(28, 21, 21)])
                .with_scores("bad", vec![(1, 1, 1)])
                .fail_batches_with("bad"),
        );
        let use_case = RunRankingUseCase::new(Arc::clone(&oracle));
        let input = RunRankingInput::new(pool(&["good", "bad"]))
            .with_config(fast_config(1).with_max_retries(2).with_top_n(0));

        let report = use_case.execute(input).await.unwrap();

        assert_eq!(report.stage1.len(), 2);
        let good = report
            .stage1
            .iter()
            .find(|s| s.candidate_id == "id-good")
            .unwrap();
        assert_eq!(good.status, ScoreStatus::Completed);
        assert_eq!(good.final_score, Some(70.0));

        let bad = report
            .stage1
            .iter()
            .find(|s| s.candidate_id == "id-bad")
            .unwrap();
        assert_eq!(bad.status, ScoreStatus::Failed);
        assert_eq!(bad.ranked_score(), None);

        let stats = &report.statistics;
        assert_eq!(stats.ranked, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.failed_batches.len(), 2);
        for attempt in stats
            .batch_attempts
            .iter()
            .filter(|a| stats.failed_batches.contains(&a.batch_id))
        {
            assert_eq!(attempt.attempts, 2);
            assert!(!attempt.success);
        }
    }

    #[tokio::test]
    async fn test_single_surviving_judgment_still_ranks() {
        let oracle = Arc::new(
            ScriptOracle::new()
                .with_scores("flaky", vec![(28, 21, 21)])
                .flaky_once("flaky"),
        );
        let use_case = RunRankingUseCase::new(Arc::clone(&oracle));
        let input = RunRankingInput::new(pool(&["flaky"]))
            .with_config(fast_config(1).with_max_retries(1).with_top_n(0));

        let report = use_case.execute(input).await.unwrap();

        let flaky = &report.stage1[0];
        assert_eq!(flaky.status, ScoreStatus::Completed);
        assert_eq!(flaky.final_score, Some(70.0));
        assert!(flaky.is_single_score());

        let stats = &report.statistics;
        assert_eq!(stats.ranked, 1);
        assert_eq!(stats.single_score, 1);
        assert_eq!(stats.failed_batches.len(), 1);
    }

    #[tokio::test]
    async fn test_stage2_failure_omits_candidate_from_analyses_only() {
        let oracle = Arc::new(
            ScriptOracle::new()
                .with_scores("high", vec![(32, 24, 24)]) // 80
                .with_scores("low", vec![(16, 12, 12)]) // 40
                .fail_analysis_for("high"),
        );
        let use_case = RunRankingUseCase::new(Arc::clone(&oracle));
        let input = RunRankingInput::new(pool(&["high", "low"]))
            .with_config(fast_config(2).with_top_n(2));

        let report = use_case.execute(input).await.unwrap();

        assert_eq!(report.stage1.len(), 2);
        assert_eq!(report.stage1[0].candidate_id, "id-high");

        assert_eq!(report.stage2.len(), 1);
        assert_eq!(report.stage2[0].candidate_id, "id-low");
        assert_eq!(report.stage2[0].summary, "Summary of low");
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_run() {
        let oracle = Arc::new(ScriptOracle::new().with_scores("x", vec![(1, 1, 1)]));
        let use_case = RunRankingUseCase::new(Arc::clone(&oracle));
        let token = CancellationToken::new();
        token.cancel();
        let input = RunRankingInput::new(pool(&["x"]))
            .with_config(fast_config(1))
            .with_cancellation(token);

        let result = use_case.execute(input).await;
        assert!(matches!(result, Err(RunRankingError::Cancelled)));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_any_call() {
        let oracle = Arc::new(ScriptOracle::new());
        let use_case = RunRankingUseCase::new(Arc::clone(&oracle));
        let input =
            RunRankingInput::new(pool(&["x"])).with_config(fast_config(1).with_batch_size(0));

        let result = use_case.execute(input).await;
        assert!(matches!(result, Err(RunRankingError::InvalidInput(_))));
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }
}
