//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! where the pipeline needs them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use triage_application::PipelineConfig;
use triage_domain::ConflictPolicy;

/// Output formats the CLI knows how to render
pub const KNOWN_FORMATS: [&str; 3] = ["full", "ranking", "json"];

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("batch_size cannot be 0")]
    InvalidBatchSize,

    #[error("third_round_batch_size cannot be 0")]
    InvalidThirdRoundBatchSize,

    #[error("max_retries cannot be 0")]
    InvalidRetries,

    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("oracle endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("oracle model cannot be empty")]
    EmptyModel,

    #[error("unknown output format: {0}")]
    UnknownFormat(String),
}

/// Raw oracle configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,
    /// Model name sent with every request
    pub model: String,
    /// Environment variable holding the bearer key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
            timeout_seconds: 120,
        }
    }
}

impl FileOracleConfig {
    /// Read the bearer key from the configured environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }
}

/// Raw pipeline configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Target batch size for stage-1 scoring
    pub batch_size: usize,
    /// Batch size for the arbitration round
    pub third_round_batch_size: usize,
    /// Total attempts per batch, including the first
    pub max_retries: u32,
    /// Delay between attempts in seconds
    pub retry_delay_seconds: u64,
    /// How many top candidates get a stage-2 deep dive; 0 disables stage 2
    pub top_n: usize,
    /// Shuffle seed for reproducible batch assignments
    pub seed: Option<u64>,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            third_round_batch_size: 5,
            max_retries: 3,
            retry_delay_seconds: 2,
            top_n: 10,
            seed: None,
        }
    }
}

/// Raw conflict-threshold configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConflictConfig {
    /// Largest tolerated difference between two total scores
    pub total_diff: u32,
    /// Largest tolerated difference between two innovation subscores
    pub innovation_diff: u32,
    /// Largest tolerated difference between two technical subscores
    pub technical_diff: u32,
    /// Largest tolerated difference between two practical subscores
    pub practical_diff: u32,
}

impl Default for FileConflictConfig {
    fn default() -> Self {
        let policy = ConflictPolicy::default();
        Self {
            total_diff: policy.total_diff,
            innovation_diff: policy.innovation_diff,
            technical_diff: policy.technical_diff,
            practical_diff: policy.practical_diff,
        }
    }
}

impl FileConflictConfig {
    pub fn policy(&self) -> ConflictPolicy {
        ConflictPolicy {
            total_diff: self.total_diff,
            innovation_diff: self.innovation_diff,
            technical_diff: self.technical_diff,
            practical_diff: self.practical_diff,
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format name; the CLI flag overrides it
    pub format: Option<String>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Oracle endpoint settings
    pub oracle: FileOracleConfig,
    /// Pipeline settings
    pub pipeline: FilePipelineConfig,
    /// Conflict thresholds
    pub conflicts: FileConflictConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.pipeline.batch_size == 0 {
            return Err(ConfigValidationError::InvalidBatchSize);
        }
        if self.pipeline.third_round_batch_size == 0 {
            return Err(ConfigValidationError::InvalidThirdRoundBatchSize);
        }
        if self.pipeline.max_retries == 0 {
            return Err(ConfigValidationError::InvalidRetries);
        }
        if self.oracle.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.oracle.endpoint.trim().is_empty() {
            return Err(ConfigValidationError::EmptyEndpoint);
        }
        if self.oracle.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModel);
        }
        if let Some(format) = &self.output.format
            && !KNOWN_FORMATS.contains(&format.as_str())
        {
            return Err(ConfigValidationError::UnknownFormat(format.clone()));
        }
        Ok(())
    }

    /// Assemble the pipeline configuration the use case consumes
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default()
            .with_batch_size(self.pipeline.batch_size)
            .with_third_round_batch_size(self.pipeline.third_round_batch_size)
            .with_conflicts(self.conflicts.policy())
            .with_max_retries(self.pipeline.max_retries)
            .with_retry_delay(Duration::from_secs(self.pipeline.retry_delay_seconds))
            .with_top_n(self.pipeline.top_n);
        if let Some(seed) = self.pipeline.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[oracle]
endpoint = "http://localhost:8080/v1"
model = "llama-3.1-8b"
api_key_env = "TRIAGE_API_KEY"
temperature = 0.7
timeout_seconds = 30

[pipeline]
batch_size = 20
third_round_batch_size = 4
max_retries = 5
retry_delay_seconds = 1
top_n = 3
seed = 7

[conflicts]
total_diff = 10
innovation_diff = 8

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.oracle.endpoint, "http://localhost:8080/v1");
        assert_eq!(config.oracle.model, "llama-3.1-8b");
        assert_eq!(config.oracle.timeout_seconds, 30);
        assert_eq!(config.pipeline.batch_size, 20);
        assert_eq!(config.pipeline.seed, Some(7));
        assert_eq!(config.conflicts.total_diff, 10);
        assert_eq!(config.conflicts.innovation_diff, 8);
        // Untouched thresholds keep their defaults
        assert_eq!(config.conflicts.technical_diff, 15);
        assert_eq!(config.output.format.as_deref(), Some("json"));
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[pipeline]
batch_size = 6
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pipeline.batch_size, 6);
        // Defaults should apply
        assert_eq!(config.pipeline.max_retries, 3);
        assert_eq!(config.oracle.model, "gpt-4o-mini");
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_default_config() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_batch_size() {
        let toml_str = r#"
[pipeline]
batch_size = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidBatchSize)
        ));
    }

    #[test]
    fn test_validate_empty_endpoint() {
        let toml_str = r#"
[oracle]
endpoint = "  "
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyEndpoint)
        ));
    }

    #[test]
    fn test_validate_unknown_format() {
        let toml_str = r#"
[output]
format = "yaml"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_pipeline_config_mapping() {
        let toml_str = r#"
[pipeline]
batch_size = 8
max_retries = 2
retry_delay_seconds = 0
top_n = 5
seed = 99

[conflicts]
total_diff = 12
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.batch_size, 8);
        assert_eq!(pipeline.max_retries, 2);
        assert_eq!(pipeline.retry_delay, Duration::ZERO);
        assert_eq!(pipeline.top_n, 5);
        assert_eq!(pipeline.seed, Some(99));
        assert_eq!(pipeline.conflicts.total_diff, 12);
    }
}
