use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use tokio_util::io::ReaderStream;

use crate::domain::entities::StreamSession;
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{last_error_line, ByteSource, ExternalProcess, MetricsReporter};

/// Read buffer for the tool's stdout; one chunk is at most this many bytes
pub const CHUNK_SIZE: usize = 64 * 1024;

type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Lazy, finite, non-restartable sequence of media chunks from one process.
///
/// Yields `Ok` chunks as the tool writes them, then either ends (clean exit)
/// or yields a single terminal `StreamAborted` error. Dropping it early kills
/// the process and records the session as aborted.
pub struct DownloadStream {
    session_id: String,
    process_id: Option<u32>,
    inner: ChunkStream,
}

impl DownloadStream {
    pub(crate) fn new(
        session: StreamSession,
        process: Box<dyn ExternalProcess>,
        stdout: ByteSource,
        metrics: Arc<dyn MetricsReporter>,
    ) -> Self {
        let session_id = session.id().to_string();
        let process_id = process.pid();

        let relay = Relay {
            session,
            process,
            reader: ReaderStream::with_capacity(stdout, CHUNK_SIZE),
            metrics,
            finished: false,
        };

        Self {
            session_id,
            process_id,
            inner: Box::pin(stream::unfold(relay, Relay::next).fuse()),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// OS process id of the external tool, if it is still known
    pub fn process_id(&self) -> Option<u32> {
        self.process_id
    }

    /// `Some(Ok)` chunk, `None` clean end, `Some(Err)` terminal failure
    pub async fn next_chunk(&mut self) -> Option<Result<Bytes>> {
        self.inner.next().await
    }
}

impl Stream for DownloadStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

struct Relay {
    session: StreamSession,
    process: Box<dyn ExternalProcess>,
    reader: ReaderStream<ByteSource>,
    metrics: Arc<dyn MetricsReporter>,
    finished: bool,
}

impl Relay {
    async fn next(mut self) -> Option<(Result<Bytes>, Self)> {
        if self.finished {
            return None;
        }

        match self.reader.next().await {
            Some(Ok(chunk)) => {
                self.session.record_chunk(chunk.len());
                self.metrics.report_bytes_streamed(chunk.len() as u64);
                Some((Ok(chunk), self))
            }
            Some(Err(e)) => {
                self.process.terminate();
                let error = DomainError::StreamAborted(format!("output channel error: {}", e));
                self.finish(Some(&error));
                Some((Err(error), self))
            }
            None => self.on_end_of_data().await,
        }
    }

    async fn on_end_of_data(mut self) -> Option<(Result<Bytes>, Self)> {
        let error = match self.process.wait().await {
            Ok(exit) if exit.success => {
                self.finish(None);
                return None;
            }
            Ok(exit) => {
                let detail = last_error_line(&exit.stderr_tail)
                    .map(str::to_string)
                    .unwrap_or_else(|| match exit.code {
                        Some(code) => format!("extraction tool exited with status {}", code),
                        None => "extraction tool was terminated".to_string(),
                    });
                DomainError::StreamAborted(detail)
            }
            Err(e) => DomainError::StreamAborted(format!("failed to reap extraction tool: {}", e)),
        };

        self.finish(Some(&error));
        Some((Err(error), self))
    }

    fn finish(&mut self, error: Option<&DomainError>) {
        let transition = match error {
            None => self.session.mark_completed(),
            Some(e) => self.session.mark_aborted(e.to_string()),
        };
        if let Err(e) = transition {
            tracing::warn!(session_id = %self.session.id(), "{}", e);
        }

        match error {
            None => tracing::info!(
                session_id = %self.session.id(),
                format_id = %self.session.request().encoding_id(),
                bytes = self.session.bytes_transferred(),
                elapsed_ms = self.session.elapsed().as_millis() as u64,
                "Download completed"
            ),
            Some(e) => tracing::error!(
                session_id = %self.session.id(),
                format_id = %self.session.request().encoding_id(),
                bytes = self.session.bytes_transferred(),
                error = %e,
                "Download aborted after headers were sent"
            ),
        }

        self.metrics.report_session_finished(&self.session, error);
        self.finished = true;
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        // Consumer went away mid-stream: the process must not outlive it
        self.process.terminate();

        let error = DomainError::StreamAborted("client disconnected".to_string());
        if let Err(e) = self.session.mark_aborted(error.to_string()) {
            tracing::warn!(session_id = %self.session.id(), "{}", e);
        }
        tracing::warn!(
            session_id = %self.session.id(),
            bytes = self.session.bytes_transferred(),
            "Client disconnected, external process terminated"
        );
        self.metrics.report_session_finished(&self.session, Some(&error));
        self.finished = true;
    }
}
