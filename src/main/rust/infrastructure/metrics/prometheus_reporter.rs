use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::domain::entities::StreamSession;
use crate::domain::errors::DomainError;
use crate::domain::ports::MetricsReporter;
use crate::domain::value_objects::{MediaDescriptor, SessionState};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref INFO_REQUESTS: IntCounter = IntCounter::new(
        "media_info_requests_total",
        "Total number of metadata resolve requests"
    ).expect("metric can be created");

    // Labelled by error kind (invalid_input, extraction_failed)
    pub static ref INFO_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("media_info_failures_total", "Failed metadata resolve requests"),
        &["kind"]
    ).expect("metric can be created");

    pub static ref DOWNLOADS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "media_downloads_rejected_total",
            "Download requests refused before a process was running"
        ),
        &["kind"]
    ).expect("metric can be created");

    pub static ref ACTIVE_DOWNLOADS: IntGauge = IntGauge::new(
        "media_active_downloads",
        "Number of download sessions with a live external process"
    ).expect("metric can be created");

    pub static ref DOWNLOADS_COMPLETED: IntCounter = IntCounter::new(
        "media_downloads_completed_total",
        "Download sessions that streamed to a clean end"
    ).expect("metric can be created");

    pub static ref DOWNLOADS_ABORTED: IntCounter = IntCounter::new(
        "media_downloads_aborted_total",
        "Download sessions that ended early (tool error or client disconnect)"
    ).expect("metric can be created");

    pub static ref BYTES_STREAMED: IntCounter = IntCounter::new(
        "media_bytes_streamed_total",
        "Total bytes relayed from the external tool to clients"
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(INFO_REQUESTS.clone()))?;
        REGISTRY.register(Box::new(INFO_FAILURES.clone()))?;
        REGISTRY.register(Box::new(DOWNLOADS_REJECTED.clone()))?;
        REGISTRY.register(Box::new(ACTIVE_DOWNLOADS.clone()))?;
        REGISTRY.register(Box::new(DOWNLOADS_COMPLETED.clone()))?;
        REGISTRY.register(Box::new(DOWNLOADS_ABORTED.clone()))?;
        REGISTRY.register(Box::new(BYTES_STREAMED.clone()))?;
        Ok(())
    }

    pub fn gather_metrics() -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return b"# Error encoding metrics\n".to_vec();
        }
        buffer
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_info_requested(&self) {
        INFO_REQUESTS.inc();
    }

    fn report_info_resolved(&self, _descriptor: &MediaDescriptor) {}

    fn report_info_failed(&self, error: &DomainError) {
        INFO_FAILURES.with_label_values(&[error.kind()]).inc();
    }

    fn report_download_rejected(&self, error: &DomainError) {
        DOWNLOADS_REJECTED.with_label_values(&[error.kind()]).inc();
    }

    fn report_session_started(&self, _session: &StreamSession) {
        ACTIVE_DOWNLOADS.inc();
    }

    fn report_bytes_streamed(&self, bytes: u64) {
        BYTES_STREAMED.inc_by(bytes);
    }

    fn report_session_finished(&self, session: &StreamSession, _error: Option<&DomainError>) {
        ACTIVE_DOWNLOADS.dec();
        match session.state() {
            SessionState::Completed => DOWNLOADS_COMPLETED.inc(),
            _ => DOWNLOADS_ABORTED.inc(),
        }
    }
}
