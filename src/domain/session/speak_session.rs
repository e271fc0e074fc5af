//! Single-flight guard for speak requests

use std::fmt;
use thiserror::Error;

/// Request states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Capturing,
    Synthesizing,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Synthesizing => "synthesizing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Speak session entity.
/// At most one request (capture and/or synthesis) is in flight at a time;
/// a request arriving while busy is rejected, never queued.
///
/// State machine:
///   IDLE -> CAPTURING (start_capture)
///   IDLE | CAPTURING -> SYNTHESIZING (start_synthesis)
///   CAPTURING | SYNTHESIZING -> IDLE (finish)
#[derive(Debug, Default)]
pub struct SpeakSession {
    state: SessionState,
}

impl SpeakSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Transition from IDLE to CAPTURING
    pub fn start_capture(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("start capture"));
        }
        self.state = SessionState::Capturing;
        Ok(())
    }

    /// Transition to SYNTHESIZING, either after a capture or directly for explicit text
    pub fn start_synthesis(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state == SessionState::Synthesizing {
            return Err(self.invalid("start synthesis"));
        }
        self.state = SessionState::Synthesizing;
        Ok(())
    }

    /// Return to IDLE once the request is done (success or failure)
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state == SessionState::Idle {
            return Err(self.invalid("finish request"));
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }
}
