//! Speech request and result value objects

use serde::Serialize;

use crate::domain::alignment::WordTimestamp;

/// Model name sent to the backend
pub const DEFAULT_MODEL: &str = "kokoro";

/// Voice used when none is configured
pub const DEFAULT_VOICE: &str = "af_heart";

/// Body of a synthesis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechRequest {
    pub model: String,
    pub voice: String,
    pub input: String,
}

impl SpeechRequest {
    pub fn new(model: impl Into<String>, voice: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            voice: voice.into(),
            input: input.into(),
        }
    }
}

/// Audio returned by the backend, with word timing when requested
#[derive(Debug, Clone, Default)]
pub struct SynthesizedSpeech {
    audio: Vec<u8>,
    timestamps: Vec<WordTimestamp>,
}

impl SynthesizedSpeech {
    /// Audio without timing information
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            audio,
            timestamps: Vec::new(),
        }
    }

    /// Audio with word timestamps; entries are ordered by start time
    pub fn with_timestamps(audio: Vec<u8>, mut timestamps: Vec<WordTimestamp>) -> Self {
        timestamps.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        Self { audio, timestamps }
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    pub fn timestamps(&self) -> &[WordTimestamp] {
        &self.timestamps
    }

    pub fn has_timestamps(&self) -> bool {
        !self.timestamps.is_empty()
    }

    /// Split into audio bytes and timestamps
    pub fn into_parts(self) -> (Vec<u8>, Vec<WordTimestamp>) {
        (self.audio, self.timestamps)
    }
}
