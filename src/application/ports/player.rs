//! Audio playback port interface

use async_trait::async_trait;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("No audio output device: {0}")]
    NoOutputDevice(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Audio player stopped responding")]
    Disconnected,
}

/// Port for audio playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Start playing encoded audio, replacing anything already playing.
    /// Returns once playback has started.
    async fn play(&self, audio: Vec<u8>) -> Result<(), PlaybackError>;

    /// Stop playback. No-op when idle.
    fn stop(&self);

    /// Whether audio is currently playing.
    fn is_playing(&self) -> bool;

    /// Current playback position in seconds, `None` when idle.
    fn position_secs(&self) -> Option<f64>;
}
