//! Progress notification port
//!
//! Defines the interface for reporting progress during a ranking run.

use triage_domain::Stage;

/// Callback for progress updates during pipeline execution
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, logs, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: &Stage, total_tasks: usize);

    /// Called when a task completes within a stage.
    ///
    /// `label` identifies the unit of work ("batch 3", a candidate id).
    fn on_task_complete(&self, stage: &Stage, label: &str, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: &Stage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: &Stage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: &Stage, _label: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: &Stage) {}
}
