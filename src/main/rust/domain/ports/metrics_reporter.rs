use crate::domain::entities::StreamSession;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::MediaDescriptor;

/// Port for metrics and error-event reporting
pub trait MetricsReporter: Send + Sync {
    fn report_info_requested(&self);
    fn report_info_resolved(&self, descriptor: &MediaDescriptor);
    fn report_info_failed(&self, error: &DomainError);

    /// Download refused before any session existed (bad input, spawn failure)
    fn report_download_rejected(&self, error: &DomainError);
    fn report_session_started(&self, session: &StreamSession);
    fn report_bytes_streamed(&self, bytes: u64);
    /// Called exactly once per session, after it reached a terminal state
    fn report_session_finished(&self, session: &StreamSession, error: Option<&DomainError>);
}
