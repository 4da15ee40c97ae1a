use std::sync::Arc;

use super::DownloadStream;
use crate::domain::entities::StreamSession;
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{MetricsReporter, ProcessSpawner};
use crate::domain::value_objects::{ContainerFormat, DownloadRequest};
use crate::infrastructure::ytdlp::CommandBuilder;

/// Application service relaying the external tool's stdout to a client
pub struct StreamBridgeService {
    spawner: Arc<dyn ProcessSpawner>,
    metrics: Arc<dyn MetricsReporter>,
    merge_format: ContainerFormat,
}

impl StreamBridgeService {
    pub fn new(spawner: Arc<dyn ProcessSpawner>, metrics: Arc<dyn MetricsReporter>) -> Self {
        Self {
            spawner,
            metrics,
            merge_format: ContainerFormat::default(),
        }
    }

    pub fn with_merge_format(mut self, merge_format: ContainerFormat) -> Self {
        self.merge_format = merge_format;
        self
    }

    pub fn merge_format(&self) -> ContainerFormat {
        self.merge_format
    }

    /// Open a download stream (use case).
    ///
    /// Every error returned here happens before any byte is produced, so the
    /// caller can still answer with a status code. Failures after that point
    /// surface as a terminal item of the returned stream.
    pub fn open_download_stream(&self, url: &str, encoding_id: &str) -> Result<DownloadStream> {
        let request = DownloadRequest::new(url.to_string(), encoding_id.to_string())
            .map_err(|e| self.reject(e))?;

        let mut session = StreamSession::new(request);
        let args = CommandBuilder::stream_args(session.request(), self.merge_format);

        let mut process = self.spawner.spawn(&args).map_err(|e| {
            self.reject(DomainError::StreamStartFailed(format!(
                "failed to spawn extraction tool: {}",
                e
            )))
        })?;

        session.mark_process_spawned()?;
        self.metrics.report_session_started(&session);

        let Some(stdout) = process.take_stdout() else {
            process.terminate();
            let error =
                DomainError::StreamStartFailed("output channel was not attached".to_string());
            session.mark_aborted(error.to_string())?;
            tracing::error!(session_id = %session.id(), error = %error, "Download failed to start");
            self.metrics.report_session_finished(&session, Some(&error));
            return Err(error);
        };

        session.mark_streaming()?;

        tracing::info!(
            session_id = %session.id(),
            format_id = %session.request().encoding_id(),
            pid = ?process.pid(),
            "Download stream opened"
        );

        Ok(DownloadStream::new(
            session,
            process,
            stdout,
            self.metrics.clone(),
        ))
    }

    fn reject(&self, error: DomainError) -> DomainError {
        tracing::error!(error = %error, "Download request rejected");
        self.metrics.report_download_rejected(&error);
        error
    }
}
