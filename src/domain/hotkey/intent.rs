//! Press intents produced by the hotkey disambiguator

use std::fmt;
use std::time::Duration;

/// One activation of the global hotkey. Carries no payload; the
/// disambiguator timestamps it on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyEvent;

/// What a resolved hotkey press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    /// Stop current playback (pressed while audio is playing)
    Stop,
    /// Capture the selection and read it aloud
    Speak,
    /// Capture the selection and open it in the reader view
    OpenReader,
}

impl HotkeyAction {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Speak => "speak",
            Self::OpenReader => "open-reader",
        }
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classified outcome of a single hotkey press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressIntent {
    /// Act now
    Immediate(HotkeyAction),
    /// Wait for a possible second press; the action is delivered
    /// later only if the window elapses uncancelled
    Deferred { action: HotkeyAction, delay: Duration },
}

impl PressIntent {
    /// The action this press resolves (or will resolve) to
    pub const fn action(&self) -> HotkeyAction {
        match self {
            Self::Immediate(action) => *action,
            Self::Deferred { action, .. } => *action,
        }
    }

    pub const fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }
}

/// Result of feeding one press into the disambiguator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressDecision {
    /// Intent of the new press
    pub intent: PressIntent,
    /// Whether a pending deferred press was cancelled by this one
    pub superseded: bool,
}
