use std::sync::Arc;

use crate::error::EngineResult;
use crate::metrics::VIOLATIONS_TOTAL;
use crate::models::{Session, ViolationOutcome, ViolationRecord, ViolationType};
use crate::store::ViolationLog;

/// Accumulates proctoring violations per session. Counts are monotonic:
/// appended to the audit trail, never decremented.
pub struct ViolationTracker {
    log: Arc<dyn ViolationLog>,
}

impl ViolationTracker {
    pub fn new(log: Arc<dyn ViolationLog>) -> Self {
        Self { log }
    }

    /// Appends the audit row and bumps the session counter. The caller
    /// holds the per-session lock and persists the session afterwards.
    pub async fn record(
        &self,
        session: &mut Session,
        violation_type: ViolationType,
        details: Option<String>,
        threshold: u32,
    ) -> EngineResult<ViolationOutcome> {
        let record = ViolationRecord::new(&session.id, violation_type, details);
        self.log.append_violation(&record).await?;

        session.violations += 1;
        VIOLATIONS_TOTAL
            .with_label_values(&[violation_type.as_str()])
            .inc();

        let auto_submit = session.violations >= threshold;
        if auto_submit {
            tracing::warn!(
                session_id = %session.id,
                violations = session.violations,
                threshold,
                violation_type = violation_type.as_str(),
                "violation threshold reached, auto-submit required"
            );
        } else {
            tracing::info!(
                session_id = %session.id,
                violations = session.violations,
                violation_type = violation_type.as_str(),
                "violation recorded"
            );
        }

        Ok(ViolationOutcome {
            count: session.violations,
            auto_submit,
        })
    }
}
