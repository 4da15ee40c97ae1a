use thiserror::Error;

use crate::domain::value_objects::SessionState;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Stream start failed: {0}")]
    StreamStartFailed(String),

    #[error("Stream aborted: {0}")]
    StreamAborted(String),

    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

impl DomainError {
    /// HTTP status code for errors surfaced before a response is committed
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::ExtractionFailed(_)
            | Self::StreamStartFailed(_)
            | Self::StreamAborted(_)
            | Self::InvalidTransition { .. } => 500,
        }
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ExtractionFailed(_) => "extraction_failed",
            Self::StreamStartFailed(_) => "stream_start_failed",
            Self::StreamAborted(_) => "stream_aborted",
            Self::InvalidTransition { .. } => "invalid_transition",
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
