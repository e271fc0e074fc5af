//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clipboard;
pub mod config;
pub mod health;
pub mod keyboard;
pub mod notifier;
pub mod player;
pub mod reader;
pub mod service_controller;
pub mod synthesizer;

// Re-export common types
pub use clipboard::{ClipboardBridge, ClipboardError};
pub use config::ConfigStore;
pub use health::{HealthError, HealthProbe};
pub use keyboard::{Key, KeyInjector, KeyboardError};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use player::{AudioPlayer, PlaybackError};
pub use reader::{NoopReader, ReaderError, ReaderSurface};
pub use service_controller::{CommandOutput, ServiceControlError, ServiceController};
pub use synthesizer::{SynthesisError, Synthesizer};
