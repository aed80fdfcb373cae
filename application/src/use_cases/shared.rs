//! Shared utilities for use cases.
//!
//! Cancellation plumbing used by the ranking pipeline: every oracle call
//! and retry sleep must abort promptly when the caller gives up on the run.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::use_cases::run_ranking::RunRankingError;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunRankingError::Cancelled)` if the token exists and is
/// cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunRankingError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunRankingError::Cancelled);
    }
    Ok(())
}

/// Drive `fut` to completion unless the token fires first.
///
/// The select is `biased` toward cancellation: an already-cancelled token
/// never lets another oracle call start.
pub(crate) async fn with_cancellation<F, T>(
    token: &Option<CancellationToken>,
    fut: F,
) -> Result<T, RunRankingError>
where
    F: Future<Output = T>,
{
    match token {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(RunRankingError::Cancelled),
                value = fut => Ok(value),
            }
        }
        None => Ok(fut.await),
    }
}
