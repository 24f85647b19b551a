//! Parse-then-render pipeline.

use std::sync::Arc;

use crate::backend::{ScheduleBackend, create_backend};
use crate::config::{BackendConfig, ConfigResult};
use crate::error::ConvertResult;
use crate::logging::OpTimer;
use crate::parser::ScheduleParser;
use crate::render::render;

/// Converts schedule text to AIXM XML.
///
/// Holds no mutable state; one converter can serve concurrent conversions.
#[derive(Debug, Clone)]
pub struct ScheduleConverter {
    parser: ScheduleParser,
}

impl ScheduleConverter {
    /// Create a converter over `backend`.
    pub fn new(backend: Arc<dyn ScheduleBackend>) -> Self {
        Self {
            parser: ScheduleParser::new(backend),
        }
    }

    /// Create a converter using the backend selected by `config`.
    pub fn from_config(config: &BackendConfig) -> ConfigResult<Self> {
        Ok(Self::new(create_backend(config)?))
    }

    /// The underlying parser.
    pub fn parser(&self) -> &ScheduleParser {
        &self.parser
    }

    /// Convert `text` to a `PropertiesWithSchedule` document.
    ///
    /// All-or-nothing: any parse or render failure is returned and no partial
    /// XML is produced.
    pub async fn convert(&self, text: &str) -> ConvertResult<String> {
        let timer = OpTimer::new("converter", "parse");
        let parsed = self.parser.parse(text).await;
        timer.finish_with_result(parsed.as_ref());
        let records = parsed?;

        let timer = OpTimer::new("converter", "render");
        let rendered = render(&records);
        timer.finish_with_result(rendered.as_ref());
        let xml = rendered?;

        tracing::info!(
            backend = %self.parser.backend().kind(),
            timesheets = records.len(),
            "Schedule converted"
        );
        Ok(xml)
    }
}
