//! Scoring oracle port
//!
//! Defines the interface for the external judgment model. The pipeline
//! never assumes clean output from it; responses are raw text expected to
//! embed JSON somewhere.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during oracle calls
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Oracle for paper judgments
///
/// This port defines how the application layer obtains judgments from an
/// LLM. Implementations (adapters) live in the infrastructure layer. One
/// call corresponds to one completion; retrying is the caller's decision.
#[async_trait]
pub trait ScoringOracle: Send + Sync {
    /// Issue one completion: system prompt plus user prompt in, raw text out
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, OracleError>;
}
