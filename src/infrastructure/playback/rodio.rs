//! Rodio-based audio player
//!
//! The output stream is not `Send`, so it lives on a dedicated thread that
//! receives play requests. The active sink is shared so position and state
//! can be queried from any thread.

use std::io::Cursor;
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{AudioPlayer, PlaybackError};

type SharedSink = Arc<Mutex<Option<Sink>>>;

struct PlayRequest {
    audio: Vec<u8>,
    reply: oneshot::Sender<Result<(), PlaybackError>>,
}

/// Audio player implementation using rodio
pub struct RodioPlayer {
    requests: std_mpsc::Sender<PlayRequest>,
    sink: SharedSink,
}

impl RodioPlayer {
    /// Spawn the player thread. The output device is opened on first use.
    pub fn new() -> Result<Self, PlaybackError> {
        let (tx, rx) = std_mpsc::channel::<PlayRequest>();
        let sink: SharedSink = Arc::new(Mutex::new(None));
        let thread_sink = Arc::clone(&sink);

        std::thread::Builder::new()
            .name("audio-player".to_string())
            .spawn(move || run_player(rx, thread_sink))
            .map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;

        Ok(Self { requests: tx, sink })
    }

    fn current(&self) -> MutexGuard<'_, Option<Sink>> {
        lock(&self.sink)
    }
}

fn lock(sink: &SharedSink) -> MutexGuard<'_, Option<Sink>> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Player thread: owns the output stream for as long as the player lives
fn run_player(requests: std_mpsc::Receiver<PlayRequest>, sink: SharedSink) {
    let mut output: Option<(OutputStream, OutputStreamHandle)> = None;

    while let Ok(PlayRequest { audio, reply }) = requests.recv() {
        let result = start_playback(&mut output, &sink, audio);
        if let Err(e) = &result {
            warn!(error = %e, "Playback failed");
        }
        let _ = reply.send(result);
    }

    debug!("Audio player thread exiting");
}

fn start_playback(
    output: &mut Option<(OutputStream, OutputStreamHandle)>,
    sink: &SharedSink,
    audio: Vec<u8>,
) -> Result<(), PlaybackError> {
    let source = Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

    if output.is_none() {
        let stream =
            OutputStream::try_default().map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;
        *output = Some(stream);
    }
    let Some((_, handle)) = output.as_ref() else {
        return Err(PlaybackError::NoOutputDevice("output stream missing".to_string()));
    };

    let new_sink = Sink::try_new(handle).map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;
    new_sink.append(source);

    if let Some(previous) = lock(sink).replace(new_sink) {
        previous.stop();
    }
    Ok(())
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, audio: Vec<u8>) -> Result<(), PlaybackError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(PlayRequest { audio, reply })
            .map_err(|_| PlaybackError::Disconnected)?;

        response.await.map_err(|_| PlaybackError::Disconnected)?
    }

    fn stop(&self) {
        if let Some(sink) = self.current().take() {
            sink.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.current().as_ref().is_some_and(|s| !s.empty())
    }

    fn position_secs(&self) -> Option<f64> {
        self.current()
            .as_ref()
            .filter(|s| !s.empty())
            .map(|s| s.get_pos().as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn idle_player_reports_nothing() {
        let player = RodioPlayer::new().unwrap();
        assert!(!player.is_playing());
        assert!(player.position_secs().is_none());
        player.stop();
    }

    #[tokio::test]
    async fn undecodable_audio_is_rejected() {
        let player = RodioPlayer::new().unwrap();
        let result = player.play(b"definitely not audio".to_vec()).await;
        assert!(matches!(result, Err(PlaybackError::Decode(_))));
        assert!(!player.is_playing());
    }

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn plays_wav_audio() {
        let player = RodioPlayer::new().unwrap();
        let result = player.play(silent_wav()).await;
        assert!(result.is_ok());
    }

    /// 100ms of 16-bit mono silence at 8kHz
    fn silent_wav() -> Vec<u8> {
        let samples = 800u32;
        let data_len = samples * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&8000u32.to_le_bytes());
        wav.extend_from_slice(&16000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav
    }
}
