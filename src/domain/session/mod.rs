//! Speak request session state machine

mod speak_session;

pub use speak_session::{InvalidStateTransition, SessionState, SpeakSession};
