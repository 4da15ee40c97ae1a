use std::sync::Arc;

use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{last_error_line, MetricsReporter, ProcessSpawner};
use crate::domain::value_objects::MediaDescriptor;
use crate::infrastructure::ytdlp::{CommandBuilder, RawInfo};

/// Application service turning a media URL into a filtered descriptor
pub struct MetadataResolver {
    spawner: Arc<dyn ProcessSpawner>,
    metrics: Arc<dyn MetricsReporter>,
}

impl MetadataResolver {
    pub fn new(spawner: Arc<dyn ProcessSpawner>, metrics: Arc<dyn MetricsReporter>) -> Self {
        Self { spawner, metrics }
    }

    /// Resolve metadata (use case). One tool invocation, no retry.
    pub async fn resolve(&self, url: &str) -> Result<MediaDescriptor> {
        self.metrics.report_info_requested();

        match self.resolve_once(url).await {
            Ok(descriptor) => {
                self.metrics.report_info_resolved(&descriptor);
                tracing::info!(
                    media_id = %descriptor.id,
                    encodings = descriptor.encodings.len(),
                    "Metadata resolved"
                );
                Ok(descriptor)
            }
            Err(e) => {
                self.metrics.report_info_failed(&e);
                tracing::error!(url = %url, error = %e, "Metadata resolve failed");
                Err(e)
            }
        }
    }

    async fn resolve_once(&self, url: &str) -> Result<MediaDescriptor> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DomainError::InvalidInput("url is required".to_string()));
        }

        let args = CommandBuilder::info_args(url);
        let output = self.spawner.output(&args).await.map_err(|e| {
            DomainError::ExtractionFailed(format!("failed to run extraction tool: {}", e))
        })?;

        if !output.success {
            let message = last_error_line(&output.stderr)
                .map(str::to_string)
                .unwrap_or_else(|| match output.code {
                    Some(code) => format!("extraction tool exited with status {}", code),
                    None => "extraction tool was terminated".to_string(),
                });
            return Err(DomainError::ExtractionFailed(message));
        }

        let info = RawInfo::from_slice(&output.stdout).map_err(|e| {
            DomainError::ExtractionFailed(format!("malformed metadata from extraction tool: {}", e))
        })?;

        Ok(info.into_descriptor())
    }
}
