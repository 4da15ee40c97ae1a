use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::{DownloadRequest, SessionState};

/// State transition record
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: SessionState,
    pub to: SessionState,
    pub timestamp: Instant,
    pub reason: Option<String>,
}

/// One in-flight download: created per request, never shared
#[derive(Debug)]
pub struct StreamSession {
    id: String,
    request: DownloadRequest,
    state: SessionState,
    bytes_transferred: u64,
    started_at: Instant,
    state_history: Vec<StateTransition>,
}

impl StreamSession {
    pub fn new(request: DownloadRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request,
            state: SessionState::Created,
            bytes_transferred: 0,
            started_at: Instant::now(),
            state_history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn request(&self) -> &DownloadRequest {
        &self.request
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn transition_count(&self) -> usize {
        self.state_history.len()
    }

    pub fn last_transition(&self) -> Option<&StateTransition> {
        self.state_history.last()
    }

    pub fn mark_process_spawned(&mut self) -> Result<()> {
        self.record_transition(SessionState::ProcessSpawned, None)
    }

    pub fn mark_streaming(&mut self) -> Result<()> {
        self.record_transition(SessionState::Streaming, None)
    }

    pub fn mark_completed(&mut self) -> Result<()> {
        self.record_transition(SessionState::Completed, None)
    }

    pub fn mark_aborted(&mut self, reason: impl Into<String>) -> Result<()> {
        self.record_transition(SessionState::Aborted, Some(reason.into()))
    }

    /// Count relayed bytes; only meaningful while streaming
    pub fn record_chunk(&mut self, len: usize) {
        if self.state.is_streaming() {
            self.bytes_transferred += len as u64;
        }
    }

    fn record_transition(&mut self, new_state: SessionState, reason: Option<String>) -> Result<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(DomainError::InvalidTransition {
                from: self.state,
                to: new_state,
            });
        }

        self.state_history.push(StateTransition {
            from: self.state,
            to: new_state,
            timestamp: Instant::now(),
            reason,
        });
        self.state = new_state;
        Ok(())
    }
}
