//! Application-level configuration.
//!
//! This module provides the knobs that control how a ranking run behaves:
//! batch sizing, retry policy, conflict thresholds and stage-2 selection.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use triage_domain::ConflictPolicy;

/// Pipeline run configuration.
///
/// `Default` gives a usable mid-size setup; callers override individual
/// fields through the builder methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Target candidates per stage-1 batch (actual sizes get ~20% slack)
    pub batch_size: usize,
    /// Candidates per arbitration batch; conflicts usually number few, so
    /// smaller batches keep the third round responsive
    pub third_round_batch_size: usize,
    /// Disagreement thresholds between a candidate's two judgments
    pub conflicts: ConflictPolicy,
    /// Total attempts per batch, first call included
    pub max_retries: u32,
    /// Fixed pause between attempts of the same batch
    pub retry_delay: Duration,
    /// Candidates promoted to stage 2; `0` disables stage 2
    pub top_n: usize,
    /// Fixed shuffle seed for reproducible batch allocation
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            third_round_batch_size: 5,
            conflicts: ConflictPolicy::default(),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            top_n: 10,
            seed: None,
        }
    }
}

impl PipelineConfig {
    // ==================== Builder Methods ====================

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_third_round_batch_size(mut self, batch_size: usize) -> Self {
        self.third_round_batch_size = batch_size;
        self
    }

    pub fn with_conflicts(mut self, conflicts: ConflictPolicy) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be positive".to_string());
        }
        if self.third_round_batch_size == 0 {
            return Err("third_round_batch_size must be positive".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1 (the first attempt)".to_string());
        }
        Ok(())
    }

    /// Retry policy derived from the retry knobs
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }
}

/// Retry policy for oracle batch calls (Value Object).
///
/// `max_attempts` counts the first call. One policy is shared by stage 1
/// and the third round, so a batch behaves the same wherever it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Build a policy; at least one attempt is always made
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fixed pause between two consecutive attempts of the same batch
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether `attempt` (1-based) leaves room for another try
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
