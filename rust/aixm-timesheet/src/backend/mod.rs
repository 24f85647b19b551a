//! Text-understanding backends.
//!
//! A backend receives raw schedule text and returns a JSON payload that should
//! be an array of six-key schedule objects. Nothing a backend returns is
//! trusted: the [`parser`](crate::parser) validates every payload.
//!
//! # Backends
//!
//! - [`MockBackend`]: fixed two-record fixture for offline wiring checks
//! - [`RuleBackend`]: deterministic rule engine over the `DAY: HHMM-HHMM` grammar
//! - [`GeminiBackend`]: Google Gemini `generateContent` API

mod gemini;
mod mock;
mod rules;

pub use gemini::GeminiBackend;
pub use mock::{MOCK_RESPONSE, MockBackend};
pub use rules::RuleBackend;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BackendConfig, ConfigResult};
use crate::error::BackendError;

/// Available backend implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Fixed fixture response.
    Mock,
    /// Deterministic grammar-based rule engine.
    Rules,
    /// Google Gemini.
    #[default]
    Gemini,
}

impl BackendKind {
    /// Configuration name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Rules => "rules",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "rules" => Ok(Self::Rules),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!(
                "unknown backend '{other}' (expected one of: mock, rules, gemini)"
            )),
        }
    }
}

/// Capability that turns schedule text into a JSON schedule payload.
#[async_trait]
pub trait ScheduleBackend: Send + Sync + fmt::Debug {
    /// Return the raw payload for `text`.
    async fn extract(&self, text: &str) -> Result<String, BackendError>;

    /// Which implementation this is.
    fn kind(&self) -> BackendKind;
}

/// Create the backend selected by `config`.
pub fn create_backend(config: &BackendConfig) -> ConfigResult<Arc<dyn ScheduleBackend>> {
    let backend: Arc<dyn ScheduleBackend> = match config.kind {
        BackendKind::Mock => Arc::new(MockBackend),
        BackendKind::Rules => Arc::new(RuleBackend),
        BackendKind::Gemini => Arc::new(GeminiBackend::new(
            &config.gemini,
            config.request_timeout(),
        )?),
    };

    tracing::debug!(backend = %backend.kind(), "Schedule backend created");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("mock".parse::<BackendKind>(), Ok(BackendKind::Mock));
        assert_eq!(" Rules ".parse::<BackendKind>(), Ok(BackendKind::Rules));
        assert_eq!("GEMINI".parse::<BackendKind>(), Ok(BackendKind::Gemini));
        assert!("openai".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_factory_honours_configured_kind() {
        let mut config = BackendConfig::default();

        config.kind = BackendKind::Mock;
        assert_eq!(create_backend(&config).unwrap().kind(), BackendKind::Mock);

        config.kind = BackendKind::Rules;
        assert_eq!(create_backend(&config).unwrap().kind(), BackendKind::Rules);

        config.kind = BackendKind::Gemini;
        config.gemini.api_key = Some("test-key".to_string());
        assert_eq!(create_backend(&config).unwrap().kind(), BackendKind::Gemini);
    }

    #[test]
    fn test_factory_requires_gemini_key() {
        let config = BackendConfig {
            kind: BackendKind::Gemini,
            ..BackendConfig::default()
        };
        assert!(create_backend(&config).is_err());
    }
}
