//! Fixture backend for offline runs.

use async_trait::async_trait;

use super::{BackendKind, ScheduleBackend};
use crate::error::BackendError;

/// Payload returned for every request.
pub const MOCK_RESPONSE: &str = r#"
[
    {"timeReference": "UTC", "startDate": "01-01", "endDate": "31-12", "day": "WORK DAY", "startTime": "08:00", "endTime": "18:00"},
    {"timeReference": "UTC", "startDate": "01-01", "endDate": "31-12", "day": "SAT", "startTime": "08:00", "endTime": "12:00"}
]
"#;

/// Backend that ignores its input and answers with [`MOCK_RESPONSE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

#[async_trait]
impl ScheduleBackend for MockBackend {
    async fn extract(&self, text: &str) -> Result<String, BackendError> {
        tracing::info!(chars = text.len(), "Using mock response");
        Ok(MOCK_RESPONSE.to_string())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }
}
