//! OpenAI-compatible HTTP oracle adapter
//!
//! Speaks the `/chat/completions` wire shape, which every common serving
//! stack (OpenAI, vLLM, llama.cpp, LM Studio) accepts. The adapter knows
//! nothing about prompts or scoring; it sends two messages and hands the
//! raw completion text back to the application layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_application::ports::oracle::{OracleError, ScoringOracle};
use triage_domain::util::ellipsize;

use crate::config::FileOracleConfig;

/// Longest error-body fragment carried into an error message, in bytes
const MAX_ERROR_BODY: usize = 300;

/// Connection settings for the HTTP oracle
#[derive(Debug, Clone)]
pub struct HttpOracleSettings {
    /// Base URL of the API, without the `/chat/completions` suffix
    pub endpoint: String,
    /// Model name sent with every request
    pub model: String,
    /// Bearer key; omitted for unauthenticated local servers
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpOracleSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.2,
            timeout: Duration::from_secs(120),
        }
    }
}

impl From<&FileOracleConfig> for HttpOracleSettings {
    fn from(config: &FileOracleConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

/// One message in the request
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion response body, reduced to the fields we read
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// ScoringOracle implementation for OpenAI-compatible chat APIs
pub struct HttpScoringOracle {
    client: Client,
    settings: HttpOracleSettings,
}

impl HttpScoringOracle {
    /// Create a new oracle with a dedicated HTTP client
    pub fn new(settings: HttpOracleSettings) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| OracleError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ScoringOracle for HttpScoringOracle {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.settings.temperature,
        };

        let mut builder = self.client.post(self.completions_url()).json(&request);
        if let Some(key) = &self.settings.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout
            } else if e.is_connect() {
                OracleError::ConnectionError(e.to_string())
            } else {
                OracleError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                ellipsize(&body, MAX_ERROR_BODY)
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::RequestFailed(format!("malformed completion body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::RequestFailed("completion had no choices".to_string()))?;

        debug!(bytes = content.len(), "oracle completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let oracle = HttpScoringOracle::new(HttpOracleSettings {
            endpoint: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            oracle.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be terse",
                },
                ChatMessage {
                    role: "user",
                    content: "score this",
                },
            ],
            temperature: 0.2,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "score this");
    }

    #[test]
    fn test_response_body_parses() {
        let body = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"scores\": []}"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        });
        let parsed: ChatResponse = serde_json::from_value(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"scores\": []}")
        );
    }

    #[test]
    fn test_settings_from_file_config() {
        let file = FileOracleConfig {
            endpoint: "http://127.0.0.1:11434/v1".to_string(),
            model: "qwen".to_string(),
            api_key_env: "TRIAGE_TEST_KEY_UNSET".to_string(),
            temperature: 0.9,
            timeout_seconds: 15,
        };
        let settings = HttpOracleSettings::from(&file);
        assert_eq!(settings.endpoint, "http://127.0.0.1:11434/v1");
        assert_eq!(settings.model, "qwen");
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.timeout, Duration::from_secs(15));
    }
}
