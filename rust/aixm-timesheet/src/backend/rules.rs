//! Deterministic rule engine.
//!
//! Reads the `DAY: HHMM-HHMM` grammar directly and answers with the same JSON
//! contract a language model is asked for, so its output goes through the
//! same validation as any other backend.

use async_trait::async_trait;

use super::{BackendKind, ScheduleBackend};
use crate::error::BackendError;
use crate::model::ScheduleRecord;
use crate::validate::validate_schedule_text;

/// Grammar-driven backend with no external dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBackend;

#[async_trait]
impl ScheduleBackend for RuleBackend {
    async fn extract(&self, text: &str) -> Result<String, BackendError> {
        let clauses = validate_schedule_text(text).map_err(|e| BackendError::Rejected {
            backend: BackendKind::Rules,
            reason: e.to_string(),
        })?;

        let records: Vec<ScheduleRecord> = clauses
            .iter()
            .map(|clause| {
                ScheduleRecord::whole_year(
                    clause.day.aixm_day(),
                    clause.start.to_string(),
                    clause.end.to_string(),
                )
            })
            .collect();

        tracing::debug!(records = records.len(), "Rule engine matched clauses");

        serde_json::to_string(&records).map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Rules
    }
}
