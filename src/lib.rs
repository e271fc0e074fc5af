//! LocalTTS - read selected text aloud with a local TTS backend
//!
//! Select text anywhere, press Ctrl+Shift+R and hear it read by a Kokoro
//! backend running in docker. A quick double press opens the text in a
//! reader view that highlights each word as it is spoken.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Word alignment, press intents, session state, config values
//! - **Application**: Use cases (capture, disambiguation, backend lifecycle, speak) and port traits
//! - **Infrastructure**: Adapters (arboard, enigo, rdev, rodio, reqwest, docker, notify-rust)
//! - **CLI**: Argument parsing, daemon loop, IPC and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
