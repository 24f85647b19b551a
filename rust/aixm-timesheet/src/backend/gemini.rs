//! Google Gemini backend.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendKind, ScheduleBackend};
use crate::config::{ConfigResult, ConfigurationError, GeminiConfig};
use crate::error::BackendError;
use crate::prompt::schedule_prompt;

/// Gemini `generateContent` client.
///
/// One request per call, never retried.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiBackend {
    /// Create a Gemini backend. Fails when no API key is configured.
    pub fn new(config: &GeminiConfig, timeout: Duration) -> ConfigResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ConfigurationError::missing_required(
                    "Gemini API key",
                    "Converting schedules with the gemini backend",
                    "GEMINI_API_KEY",
                )
            })?
            .to_string();

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ConfigurationError::invalid(
                format!("Failed to build HTTP client: {e}"),
                "Check the TLS setup of this machine",
            )
        })?;

        tracing::info!(model = %config.model, base_url = %config.base_url, "Gemini backend initialized");

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            timeout,
        })
    }

    /// Build the API URL.
    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn transport_error(&self, err: &reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            BackendError::Network(format!("Connection failed: {err}"))
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ScheduleBackend for GeminiBackend {
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    async fn extract(&self, text: &str) -> Result<String, BackendError> {
        let prompt = schedule_prompt(text);
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let response = self
            .client
            .post(self.api_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Gemini API returned error: {}", raw);
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: raw,
            });
        }

        let envelope: GenerateResponse = serde_json::from_str(&raw)
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        let answer = envelope.text().ok_or(BackendError::EmptyResponse)?;

        tracing::info!("Raw API response: {}", answer);
        Ok(strip_code_fence(&answer).to_string())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Gemini
    }
}

/// Remove a Markdown code fence wrapped around the whole answer.
fn strip_code_fence(answer: &str) -> &str {
    let trimmed = answer.trim();
    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };

    // Drop a language tag such as "json" on the opening line.
    let body = match body.split_once('\n') {
        Some((tag, inner)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => inner,
        _ => body,
    };
    body.trim()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
        }
    }

    #[test]
    fn test_api_url() {
        let backend = GeminiBackend::new(&config(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.api_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let mut cfg = config();
        cfg.api_key = Some("   ".to_string());
        let err = GeminiBackend::new(&cfg, Duration::from_secs(5)).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let backend = GeminiBackend::new(&config(), Duration::from_secs(5)).unwrap();
        assert!(!format!("{backend:?}").contains("test-key"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
        assert_eq!(strip_code_fence("not json"), "not json");
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let envelope: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(envelope.text().as_deref(), Some(r#"[{"a":1}]"#));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let envelope: GenerateResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert_eq!(envelope.text(), None);
    }
}
