use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // Session lifecycle
    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "exam_sessions_total",
        "Total number of exam sessions by lifecycle event",
        &["status"]
    )
    .unwrap();

    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "exam_sessions_active",
        "Number of sessions currently in flight"
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "exam_answers_submitted_total",
        "Total number of graded answer submissions",
        &["correct"]
    )
    .unwrap();

    pub static ref DIFFICULTY_ADJUSTMENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "exam_difficulty_adjustments_total",
        "Total number of difficulty adjustments",
        &["direction"]
    )
    .unwrap();

    // Proctoring
    pub static ref VIOLATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "exam_violations_total",
        "Total number of proctoring violations recorded",
        &["violation_type"]
    )
    .unwrap();

    // Recording ingest
    pub static ref RECORDINGS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "exam_recordings_total",
        "Total number of recordings by lifecycle event",
        &["status"]
    )
    .unwrap();

    pub static ref RECORDING_CHUNKS_TOTAL: IntCounter = register_int_counter!(
        "exam_recording_chunks_total",
        "Total number of video chunks appended"
    )
    .unwrap();

    pub static ref RECORDING_BYTES_TOTAL: IntCounter = register_int_counter!(
        "exam_recording_bytes_total",
        "Total bytes of video appended"
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Just verify that all metrics are properly registered
        let _ = SESSIONS_TOTAL.with_label_values(&["created"]).get();
        let _ = VIOLATIONS_TOTAL.with_label_values(&["tab_switch"]).get();
    }

    #[test]
    fn test_render_metrics() {
        SESSIONS_TOTAL.with_label_values(&["created"]).inc();

        let output = render_metrics().unwrap();
        assert!(output.contains("exam_sessions_total"));
    }
}
