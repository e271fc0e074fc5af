//! Speak use case
//!
//! Glues resolved hotkey actions to capture, synthesis, playback and the
//! reader view. Only one capture/synthesis request is in flight at a time.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::alignment::{tokenize, HighlightChange, HighlightTracker, WordAligner};
use crate::domain::config::AppConfig;
use crate::domain::hotkey::HotkeyAction;
use crate::domain::session::{SessionState, SpeakSession};
use crate::domain::text::clean_text;

use super::capture::{CaptureError, SelectionCapture};
use super::ports::{
    AudioPlayer, ClipboardBridge, KeyInjector, NotificationIcon, Notifier, PlaybackError,
    ReaderError, ReaderSurface, SynthesisError, Synthesizer,
};

const APP_NAME: &str = "LocalTTS";

/// Errors from the speak use case
#[derive(Debug, Error)]
pub enum SpeakError {
    #[error("No text selected")]
    NoText,

    #[error("A speech request is already in progress")]
    Busy,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Reader(#[from] ReaderError),
}

/// Settings for the speak use case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakConfig {
    /// Show desktop notifications
    pub enable_notify: bool,
    /// Start reading as soon as the reader opens
    pub reader_auto_play: bool,
    /// How often the highlight follows the playback position
    pub highlight_interval: Duration,
}

impl Default for SpeakConfig {
    fn default() -> Self {
        Self {
            enable_notify: false,
            reader_auto_play: true,
            highlight_interval: Duration::from_millis(50),
        }
    }
}

impl From<&AppConfig> for SpeakConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            enable_notify: config.notify_or_default(),
            reader_auto_play: config.reader_auto_play_or_default(),
            ..Self::default()
        }
    }
}

/// Result of handling an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// Playback was stopped
    Stopped,
    /// Text was synthesized and playback started
    Spoken { chars: usize },
    /// Text was shown in the reader, and read aloud if `played`
    ReaderOpened { tokens: usize, played: bool },
}

/// Speak use case
pub struct SpeakUseCase<C, K, S, P, R, N>
where
    C: ClipboardBridge,
    K: KeyInjector,
    S: Synthesizer,
    P: AudioPlayer,
    R: ReaderSurface,
    N: Notifier,
{
    capture: SelectionCapture<C, K>,
    synthesizer: S,
    player: P,
    reader: R,
    notifier: N,
    session: Mutex<SpeakSession>,
    config: SpeakConfig,
}

impl<C, K, S, P, R, N> SpeakUseCase<C, K, S, P, R, N>
where
    C: ClipboardBridge,
    K: KeyInjector,
    S: Synthesizer,
    P: AudioPlayer,
    R: ReaderSurface,
    N: Notifier,
{
    pub fn new(
        capture: SelectionCapture<C, K>,
        synthesizer: S,
        player: P,
        reader: R,
        notifier: N,
        config: SpeakConfig,
    ) -> Self {
        Self {
            capture,
            synthesizer,
            player,
            reader,
            notifier,
            session: Mutex::new(SpeakSession::new()),
            config,
        }
    }

    /// Current request state
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Request state without waiting; `None` while the session is locked
    pub fn try_state(&self) -> Option<SessionState> {
        self.session.try_lock().ok().map(|session| session.state())
    }

    /// Wait for an in-flight selection capture to restore the clipboard
    pub async fn wait_for_capture(&self) {
        self.capture.wait_idle().await;
    }

    /// True while audio is playing; a press then means "stop"
    pub fn is_busy(&self) -> bool {
        self.player.is_playing()
    }

    /// Handle a resolved hotkey action.
    ///
    /// Failures are reported as notifications before being returned.
    pub async fn handle(&self, action: HotkeyAction) -> Result<SpeakOutcome, SpeakError> {
        debug!(%action, "Handling hotkey action");
        let result = match action {
            HotkeyAction::Stop => Ok(self.stop()),
            HotkeyAction::Speak => self.speak_selection().await,
            HotkeyAction::OpenReader => self.open_reader().await,
        };

        if let Err(e) = &result {
            self.report(e).await;
        }
        result
    }

    /// Stop playback
    pub fn stop(&self) -> SpeakOutcome {
        info!("Stopping playback");
        self.player.stop();
        SpeakOutcome::Stopped
    }

    /// Capture the selection and read it aloud
    pub async fn speak_selection(&self) -> Result<SpeakOutcome, SpeakError> {
        self.begin_capture().await?;
        let result = async {
            let text = self.capture_text().await?;
            self.begin_synthesis().await?;
            self.speak(&text).await
        }
        .await;
        self.finish().await;
        result
    }

    /// Capture the selection and show it in the reader
    pub async fn open_reader(&self) -> Result<SpeakOutcome, SpeakError> {
        self.begin_capture().await?;
        let captured = self.capture_text().await;
        self.finish().await;

        let text = clean_text(&captured?);
        if text.is_empty() {
            return Err(SpeakError::NoText);
        }

        if self.config.reader_auto_play {
            self.read_aloud(&text).await
        } else {
            let tokens = tokenize(&text);
            self.reader.show_text(&tokens)?;
            Ok(SpeakOutcome::ReaderOpened {
                tokens: tokens.len(),
                played: false,
            })
        }
    }

    /// Synthesize and play explicit text
    pub async fn speak_text(&self, text: &str) -> Result<SpeakOutcome, SpeakError> {
        if text.trim().is_empty() {
            return Err(SpeakError::NoText);
        }
        self.begin_synthesis().await?;
        let result = self.speak(text).await;
        self.finish().await;
        result
    }

    /// Show text in the reader, read it aloud and follow along with the
    /// highlight until playback ends
    pub async fn read_aloud(&self, text: &str) -> Result<SpeakOutcome, SpeakError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(SpeakError::NoText);
        }
        self.reader.show_text(&tokens)?;

        self.begin_synthesis().await?;
        self.notify("Synthesizing...", NotificationIcon::Processing).await;
        let speech = self.synthesizer.synthesize_with_timestamps(text).await;
        self.finish().await;

        let (audio, timestamps) = speech?.into_parts();
        debug!(
            timestamps = timestamps.len(),
            tokens = tokens.len(),
            "Aligning reader text"
        );
        let mut tracker = HighlightTracker::new(WordAligner::new(timestamps, &tokens));

        self.player.play(audio).await?;
        self.follow_highlight(&mut tracker).await?;

        Ok(SpeakOutcome::ReaderOpened {
            tokens: tokens.len(),
            played: true,
        })
    }

    /// Wait until the current playback ends
    pub async fn wait_until_idle(&self) {
        let mut ticker = tokio::time::interval(self.config.highlight_interval);
        while self.player.is_playing() {
            ticker.tick().await;
        }
    }

    async fn speak(&self, text: &str) -> Result<SpeakOutcome, SpeakError> {
        self.notify("Synthesizing...", NotificationIcon::Processing).await;

        let speech = self.synthesizer.synthesize(text).await?;
        let (audio, _) = speech.into_parts();
        self.player.play(audio).await?;

        let chars = text.chars().count();
        info!(chars, "Playback started");
        Ok(SpeakOutcome::Spoken { chars })
    }

    async fn capture_text(&self) -> Result<String, SpeakError> {
        self.capture.capture().await?.ok_or(SpeakError::NoText)
    }

    async fn follow_highlight(&self, tracker: &mut HighlightTracker) -> Result<(), SpeakError> {
        let mut ticker = tokio::time::interval(self.config.highlight_interval);
        loop {
            ticker.tick().await;
            if !self.player.is_playing() {
                break;
            }
            let Some(position) = self.player.position_secs() else {
                continue;
            };
            match tracker.update(position) {
                HighlightChange::Unchanged => {}
                HighlightChange::Moved(index) => self.reader.set_highlight(Some(index))?,
                HighlightChange::Cleared => self.reader.set_highlight(None)?,
            }
        }

        if tracker.clear() == HighlightChange::Cleared {
            self.reader.set_highlight(None)?;
        }
        Ok(())
    }

    async fn begin_capture(&self) -> Result<(), SpeakError> {
        self.session
            .lock()
            .await
            .start_capture()
            .map_err(|_| SpeakError::Busy)
    }

    async fn begin_synthesis(&self) -> Result<(), SpeakError> {
        self.session
            .lock()
            .await
            .start_synthesis()
            .map_err(|_| SpeakError::Busy)
    }

    async fn finish(&self) {
        let mut session = self.session.lock().await;
        if !session.is_idle() {
            let _ = session.finish();
        }
    }

    async fn report(&self, error: &SpeakError) {
        match error {
            SpeakError::Busy => debug!("Ignoring request while another is in flight"),
            SpeakError::NoText => {
                info!("Nothing selected");
                self.notify("No text selected", NotificationIcon::Warning).await;
            }
            e => {
                warn!(error = %e, "Speak request failed");
                self.notify(&e.to_string(), NotificationIcon::Error).await;
            }
        }
    }

    async fn notify(&self, message: &str, icon: NotificationIcon) {
        if self.config.enable_notify {
            if let Err(e) = self.notifier.notify(APP_NAME, message, icon).await {
                debug!(error = %e, "Notification failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::capture::CaptureTiming;
    use crate::application::ports::{ClipboardError, Key, KeyboardError, NotificationError};
    use crate::domain::alignment::{RenderedToken, WordTimestamp};
    use crate::domain::speech::SynthesizedSpeech;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    struct MockClipboard {
        content: Arc<StdMutex<Option<String>>>,
    }

    #[async_trait]
    impl ClipboardBridge for MockClipboard {
        async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
            Ok(self.content.lock().unwrap().clone())
        }

        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            *self.content.lock().unwrap() = Some(text.to_string());
            Ok(())
        }

        async fn clear(&self) -> Result<(), ClipboardError> {
            *self.content.lock().unwrap() = None;
            Ok(())
        }
    }

    struct MockKeyboard {
        content: Arc<StdMutex<Option<String>>>,
        selection: Option<String>,
    }

    #[async_trait]
    impl KeyInjector for MockKeyboard {
        async fn key_down(&self, key: Key) -> Result<(), KeyboardError> {
            if key == Key::C {
                if let Some(text) = &self.selection {
                    *self.content.lock().unwrap() = Some(text.clone());
                }
            }
            Ok(())
        }

        async fn key_up(&self, _key: Key) -> Result<(), KeyboardError> {
            Ok(())
        }

        fn is_key_held(&self, _key: Key) -> bool {
            false
        }
    }

    struct MockSynthesizer {
        timestamps: Vec<WordTimestamp>,
        fail: bool,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Synthesizer for MockSynthesizer {
        async fn synthesize(&self, _text: &str) -> Result<SynthesizedSpeech, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SynthesisError::Unreachable("connection refused".into()));
            }
            Ok(SynthesizedSpeech::new(vec![1, 2, 3]))
        }

        async fn synthesize_with_timestamps(
            &self,
            _text: &str,
        ) -> Result<SynthesizedSpeech, SynthesisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SynthesisError::Timeout);
            }
            Ok(SynthesizedSpeech::with_timestamps(
                vec![1, 2, 3],
                self.timestamps.clone(),
            ))
        }
    }

    /// Player whose position advances by one tick per query
    #[derive(Clone, Default)]
    struct MockPlayer {
        playing: Arc<AtomicBool>,
        /// Position in hundredths of a second
        position: Arc<AtomicU32>,
        step: u32,
        length: u32,
        played: Arc<AtomicU32>,
    }

    #[async_trait]
    impl AudioPlayer for MockPlayer {
        async fn play(&self, _audio: Vec<u8>) -> Result<(), PlaybackError> {
            self.played.fetch_add(1, Ordering::SeqCst);
            self.position.store(0, Ordering::SeqCst);
            self.playing.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&self) {
            self.playing.store(false, Ordering::SeqCst);
        }

        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::SeqCst)
        }

        fn position_secs(&self) -> Option<f64> {
            if !self.is_playing() {
                return None;
            }
            let pos = self.position.fetch_add(self.step, Ordering::SeqCst);
            if pos >= self.length {
                self.playing.store(false, Ordering::SeqCst);
            }
            Some(f64::from(pos) / 100.0)
        }
    }

    #[derive(Clone, Default)]
    struct MockReader {
        shown: Arc<StdMutex<Vec<String>>>,
        highlights: Arc<StdMutex<Vec<Option<usize>>>>,
    }

    impl ReaderSurface for MockReader {
        fn show_text(&self, tokens: &[RenderedToken]) -> Result<(), ReaderError> {
            *self.shown.lock().unwrap() = tokens.iter().map(|t| t.text.clone()).collect();
            Ok(())
        }

        fn set_highlight(&self, token: Option<usize>) -> Result<(), ReaderError> {
            self.highlights.lock().unwrap().push(token);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MockNotifier {
        messages: Arc<StdMutex<Vec<(String, NotificationIcon)>>>,
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn notify(
            &self,
            _title: &str,
            message: &str,
            icon: NotificationIcon,
        ) -> Result<(), NotificationError> {
            self.messages.lock().unwrap().push((message.to_string(), icon));
            Ok(())
        }
    }

    type TestUseCase =
        SpeakUseCase<MockClipboard, MockKeyboard, MockSynthesizer, MockPlayer, MockReader, MockNotifier>;

    struct Harness {
        use_case: TestUseCase,
        player: MockPlayer,
        reader: MockReader,
        notifier: MockNotifier,
        synth_calls: Arc<AtomicU32>,
        clipboard: Arc<StdMutex<Option<String>>>,
    }

    fn harness(selection: Option<&str>, fail_synthesis: bool, config: SpeakConfig) -> Harness {
        let content = Arc::new(StdMutex::new(Some("clipboard".to_string())));
        let clipboard = Arc::clone(&content);
        let capture = SelectionCapture::with_timing(
            MockClipboard {
                content: Arc::clone(&content),
            },
            MockKeyboard {
                content,
                selection: selection.map(String::from),
            },
            CaptureTiming::default(),
        );
        let synth_calls = Arc::new(AtomicU32::new(0));
        let synthesizer = MockSynthesizer {
            timestamps: vec![
                WordTimestamp::new("hello", 0.0, 0.4),
                WordTimestamp::new(",", 0.4, 0.5),
                WordTimestamp::new("world", 0.5, 0.9),
            ],
            fail: fail_synthesis,
            calls: Arc::clone(&synth_calls),
        };
        let player = MockPlayer {
            step: 10,
            length: 120,
            ..Default::default()
        };
        let reader = MockReader::default();
        let notifier = MockNotifier::default();

        Harness {
            use_case: SpeakUseCase::new(
                capture,
                synthesizer,
                player.clone(),
                reader.clone(),
                notifier.clone(),
                config,
            ),
            player,
            reader,
            notifier,
            synth_calls,
            clipboard,
        }
    }

    fn notify_config() -> SpeakConfig {
        SpeakConfig {
            enable_notify: true,
            ..SpeakConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn speak_plays_captured_text() {
        let h = harness(Some("Hello world"), false, SpeakConfig::default());

        let outcome = h.use_case.handle(HotkeyAction::Speak).await.unwrap();

        assert_eq!(outcome, SpeakOutcome::Spoken { chars: 11 });
        assert_eq!(h.player.played.load(Ordering::SeqCst), 1);
        assert!(h.use_case.is_busy());
        assert_eq!(h.use_case.state().await, SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_selection_notifies_and_skips_synthesis() {
        let h = harness(None, false, notify_config());

        let result = h.use_case.handle(HotkeyAction::Speak).await;

        assert!(matches!(result, Err(SpeakError::NoText)));
        assert_eq!(h.synth_calls.load(Ordering::SeqCst), 0);
        let messages = h.notifier.messages.lock().unwrap().clone();
        assert_eq!(messages.last().unwrap().1, NotificationIcon::Warning);
        assert_eq!(h.use_case.state().await, SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn synthesis_failure_skips_playback() {
        let h = harness(Some("Hello"), true, notify_config());

        let result = h.use_case.handle(HotkeyAction::Speak).await;

        assert!(matches!(result, Err(SpeakError::Synthesis(_))));
        assert_eq!(h.player.played.load(Ordering::SeqCst), 0);
        let messages = h.notifier.messages.lock().unwrap().clone();
        assert_eq!(messages.last().unwrap().1, NotificationIcon::Error);
        assert_eq!(h.use_case.state().await, SessionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_request_is_rejected() {
        let h = harness(Some("Hello"), false, SpeakConfig::default());
        h.use_case.session.lock().await.start_capture().unwrap();

        let result = h.use_case.speak_selection().await;

        assert!(matches!(result, Err(SpeakError::Busy)));
        assert_eq!(h.synth_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_speak_restores_clipboard_before_shutdown() {
        let h = harness(Some("Hello"), false, SpeakConfig::default());

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), h.use_case.handle(HotkeyAction::Speak)).await;
        assert!(outcome.is_err());

        h.use_case.wait_for_capture().await;
        assert_eq!(h.clipboard.lock().unwrap().as_deref(), Some("clipboard"));
        assert_eq!(h.synth_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn try_state_snapshots_without_waiting() {
        let h = harness(Some("Hello"), false, SpeakConfig::default());
        assert_eq!(h.use_case.try_state(), Some(SessionState::Idle));

        let mut session = h.use_case.session.lock().await;
        session.start_capture().unwrap();
        assert_eq!(h.use_case.try_state(), None);
        drop(session);

        assert_eq!(h.use_case.try_state(), Some(SessionState::Capturing));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_playback() {
        let h = harness(Some("Hello"), false, SpeakConfig::default());
        h.use_case.handle(HotkeyAction::Speak).await.unwrap();
        assert!(h.use_case.is_busy());

        let outcome = h.use_case.handle(HotkeyAction::Stop).await.unwrap();

        assert_eq!(outcome, SpeakOutcome::Stopped);
        assert!(!h.use_case.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn reader_follows_playback_and_clears_at_end() {
        let h = harness(Some("Hello,\nworld"), false, SpeakConfig::default());

        let outcome = h.use_case.handle(HotkeyAction::OpenReader).await.unwrap();

        assert_eq!(
            outcome,
            SpeakOutcome::ReaderOpened {
                tokens: 2,
                played: true
            }
        );
        assert_eq!(*h.reader.shown.lock().unwrap(), vec!["Hello,", "world"]);
        let highlights = h.reader.highlights.lock().unwrap().clone();
        assert_eq!(highlights, vec![Some(0), Some(1), None]);
    }

    #[tokio::test(start_paused = true)]
    async fn reader_without_auto_play_only_shows_text() {
        let config = SpeakConfig {
            reader_auto_play: false,
            ..SpeakConfig::default()
        };
        let h = harness(Some("one two three"), false, config);

        let outcome = h.use_case.handle(HotkeyAction::OpenReader).await.unwrap();

        assert_eq!(
            outcome,
            SpeakOutcome::ReaderOpened {
                tokens: 3,
                played: false
            }
        );
        assert_eq!(h.synth_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn speak_text_rejects_blank_input() {
        let h = harness(None, false, SpeakConfig::default());

        assert!(matches!(
            h.use_case.speak_text("   ").await,
            Err(SpeakError::NoText)
        ));
        assert_eq!(
            h.use_case.speak_text("Read this").await.unwrap(),
            SpeakOutcome::Spoken { chars: 9 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wait_until_idle_returns_after_playback() {
        let h = harness(None, false, SpeakConfig::default());
        h.use_case.speak_text("Hello").await.unwrap();

        let player = h.player.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            player.stop();
        });

        h.use_case.wait_until_idle().await;
        assert!(!h.use_case.is_busy());
    }
}
