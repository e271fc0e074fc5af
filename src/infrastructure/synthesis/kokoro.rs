//! Kokoro-FastAPI synthesizer adapter

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ports::{SynthesisError, Synthesizer};
use crate::domain::alignment::WordTimestamp;
use crate::domain::speech::{SpeechRequest, SynthesizedSpeech, DEFAULT_MODEL, DEFAULT_VOICE};

/// OpenAI-compatible speech endpoint
const SPEECH_PATH: &str = "/v1/audio/speech";

/// Speech endpoint that also reports word timing
const CAPTIONED_PATH: &str = "/dev/captioned_speech";

/// Synthesis can take a while for long selections
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// Request types

#[derive(Debug, Serialize)]
struct CaptionedRequest<'a> {
    #[serde(flatten)]
    speech: &'a SpeechRequest,
    response_format: &'static str,
    stream: bool,
}

// Response types

#[derive(Debug, Deserialize)]
struct CaptionedResponse {
    audio: String,
    #[serde(default)]
    timestamps: Vec<WordTimestamp>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Kokoro-FastAPI synthesizer
pub struct KokoroSynthesizer {
    base_url: String,
    model: String,
    voice: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl KokoroSynthesizer {
    /// Create a synthesizer for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            timeout: REQUEST_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_request(&self, text: &str) -> SpeechRequest {
        SpeechRequest::new(&self.model, &self.voice, text)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, SynthesisError> {
        let url = self.url(path);
        debug!(url = %url, voice = %self.voice, "Requesting speech");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response)
    }
}

fn map_request_error(e: reqwest::Error) -> SynthesisError {
    if e.is_timeout() {
        SynthesisError::Timeout
    } else {
        SynthesisError::Unreachable(e.to_string())
    }
}

/// Pull FastAPI's `detail` out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .map(|d| match d {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

    match detail {
        Some(detail) => detail,
        None if body.trim().is_empty() => "Unknown error".to_string(),
        None => body.trim().to_string(),
    }
}

fn decode_captioned(response: CaptionedResponse) -> Result<SynthesizedSpeech, SynthesisError> {
    let audio = base64::engine::general_purpose::STANDARD
        .decode(response.audio.trim())
        .map_err(|e| SynthesisError::InvalidResponse(format!("audio is not base64: {}", e)))?;

    if audio.is_empty() {
        return Err(SynthesisError::EmptyAudio);
    }

    Ok(SynthesizedSpeech::with_timestamps(audio, response.timestamps))
}

#[async_trait]
impl Synthesizer for KokoroSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedSpeech, SynthesisError> {
        let request = self.build_request(text);
        let response = self.post(SPEECH_PATH, &request).await?;

        let audio = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        debug!(bytes = audio.len(), "Speech received");
        Ok(SynthesizedSpeech::new(audio.to_vec()))
    }

    async fn synthesize_with_timestamps(
        &self,
        text: &str,
    ) -> Result<SynthesizedSpeech, SynthesisError> {
        let request = self.build_request(text);
        let body = CaptionedRequest {
            speech: &request,
            response_format: "mp3",
            stream: false,
        };
        let response = self.post(CAPTIONED_PATH, &body).await?;

        let parsed: CaptionedResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        let speech = decode_captioned(parsed)?;
        debug!(
            bytes = speech.audio().len(),
            words = speech.timestamps().len(),
            "Captioned speech received"
        );
        Ok(speech)
    }
}
