use std::fmt;

/// Download session states (pure domain)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Request accepted, nothing spawned yet
    #[default]
    Created,
    /// External process running, output channel not yet attached
    ProcessSpawned,
    /// Bytes are being relayed to the client
    Streaming,
    /// Process exited cleanly after end of data
    Completed,
    /// Process failed, channel errored, or client went away
    Aborted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::ProcessSpawned => write!(f, "PROCESS_SPAWNED"),
            Self::Streaming => write!(f, "STREAMING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Aborted => write!(f, "ABORTED"),
        }
    }
}

impl SessionState {
    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::ProcessSpawned)
                | (Self::ProcessSpawned, Self::Streaming)
                | (Self::ProcessSpawned, Self::Aborted)
                | (Self::Streaming, Self::Completed)
                | (Self::Streaming, Self::Aborted)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }
}
