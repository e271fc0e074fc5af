//! Speech synthesis port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::speech::SynthesizedSpeech;

/// Synthesis errors
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("Cannot reach the TTS backend: {0}")]
    Unreachable(String),

    #[error("TTS request timed out")]
    Timeout,

    #[error("TTS backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("TTS backend returned no audio")]
    EmptyAudio,

    #[error("Failed to parse TTS response: {0}")]
    InvalidResponse(String),
}

/// Port for text-to-speech synthesis
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize text into audio bytes, without word timing.
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, SynthesisError>;

    /// Synthesize text into audio bytes plus word-level timestamps.
    async fn synthesize_with_timestamps(
        &self,
        text: &str,
    ) -> Result<SynthesizedSpeech, SynthesisError>;
}
