//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the clipboard, docker,
//! the Kokoro HTTP API and the audio device.

pub mod clipboard;
pub mod config;
pub mod health;
pub mod hotkey;
pub mod keyboard;
pub mod notification;
pub mod playback;
pub mod reader;
pub mod service;
pub mod synthesis;

// Re-export adapters
pub use clipboard::ArboardClipboard;
pub use config::XdgConfigStore;
pub use health::HttpHealthProbe;
pub use hotkey::RdevHotkeyListener;
pub use keyboard::{EnigoKeyboard, ModifierTracker};
pub use notification::NotifyRustNotifier;
pub use playback::RodioPlayer;
pub use reader::TerminalReader;
pub use service::DockerController;
pub use synthesis::KokoroSynthesizer;
