//! Domain layer - Core logic
//!
//! Contains value objects, the alignment algorithm, state machines and errors.
//! This layer has no dependencies on external systems.

pub mod alignment;
pub mod config;
pub mod error;
pub mod hotkey;
pub mod service;
pub mod session;
pub mod speech;
pub mod text;

// Re-export common types
pub use alignment::{AlignmentMap, HighlightTracker, RenderedToken, WordAligner, WordTimestamp};
pub use config::AppConfig;
pub use error::*;
pub use hotkey::{HotkeyAction, PressDecision, PressIntent};
pub use service::{ServiceHandle, ServiceStatus};
pub use session::{SessionState, SpeakSession};
pub use speech::{SpeechRequest, SynthesizedSpeech};
