//! Speech synthesis domain module

mod request;

pub use request::{SpeechRequest, SynthesizedSpeech, DEFAULT_MODEL, DEFAULT_VOICE};
