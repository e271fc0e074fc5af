//! Selection capture use case
//!
//! Reads the text currently selected in the focused application by sending
//! a synthetic copy and borrowing the clipboard for the duration of the call.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::ports::{ClipboardBridge, Key, KeyInjector, KeyboardError};

/// Errors from selection capture
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to send copy keystroke: {0}")]
    Keyboard(#[from] KeyboardError),

    #[error("Capture task failed: {0}")]
    Interrupted(String),
}

/// Timing of the capture sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureTiming {
    /// How many times to poll for released modifiers
    pub modifier_poll_attempts: u32,
    /// Delay between modifier polls
    pub modifier_poll_interval: Duration,
    /// Delay between the steps of the copy chord
    pub key_step_delay: Duration,
    /// Delay for the target application to fill the clipboard
    pub settle_delay: Duration,
}

impl Default for CaptureTiming {
    fn default() -> Self {
        Self {
            modifier_poll_attempts: 50,
            modifier_poll_interval: Duration::from_millis(10),
            key_step_delay: Duration::from_millis(60),
            settle_delay: Duration::from_millis(300),
        }
    }
}

/// Selection capture via synthetic copy
pub struct SelectionCapture<C, K>
where
    C: ClipboardBridge,
    K: KeyInjector,
{
    steps: Arc<CaptureSteps<C, K>>,
    in_flight: Arc<Semaphore>,
}

impl<C, K> SelectionCapture<C, K>
where
    C: ClipboardBridge,
    K: KeyInjector,
{
    pub fn new(clipboard: C, keyboard: K) -> Self {
        Self::with_timing(clipboard, keyboard, CaptureTiming::default())
    }

    pub fn with_timing(clipboard: C, keyboard: K, timing: CaptureTiming) -> Self {
        Self {
            steps: Arc::new(CaptureSteps {
                clipboard,
                keyboard,
                timing,
            }),
            in_flight: Arc::new(Semaphore::new(1)),
        }
    }

    /// Capture the current selection.
    ///
    /// Returns `Ok(None)` when nothing non-blank was copied. The sequence
    /// runs in its own task, so the clipboard is restored to its previous
    /// text on every path, even when the caller is dropped mid-capture.
    pub async fn capture(&self) -> Result<Option<String>, CaptureError> {
        let permit = Arc::clone(&self.in_flight)
            .acquire_owned()
            .await
            .map_err(|e| CaptureError::Interrupted(e.to_string()))?;
        let steps = Arc::clone(&self.steps);

        tokio::spawn(async move {
            let result = steps.run().await;
            drop(permit);
            result
        })
        .await
        .map_err(|e| CaptureError::Interrupted(e.to_string()))?
    }

    /// Wait until no capture is in flight, so the clipboard holds the
    /// user's content again.
    pub async fn wait_idle(&self) {
        let _ = self.in_flight.acquire().await;
    }
}

/// Clipboard and keyboard steps of one capture
struct CaptureSteps<C, K> {
    clipboard: C,
    keyboard: K,
    timing: CaptureTiming,
}

impl<C, K> CaptureSteps<C, K>
where
    C: ClipboardBridge,
    K: KeyInjector,
{
    async fn run(&self) -> Result<Option<String>, CaptureError> {
        // Modifiers must be up before the clipboard is touched.
        self.release_modifiers().await;

        let snapshot = match self.clipboard.read_text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Clipboard snapshot failed, treating as empty");
                None
            }
        };

        let result = self.copy_selection().await;
        self.restore(snapshot).await;

        if let Ok(text) = &result {
            debug!(chars = text.as_ref().map_or(0, |t| t.chars().count()), "Capture finished");
        }
        result
    }

    async fn release_modifiers(&self) {
        for key in Key::MODIFIERS {
            self.send_key_up(key).await;
        }

        for _ in 0..self.timing.modifier_poll_attempts {
            let held: Vec<Key> = Key::MODIFIERS
                .into_iter()
                .filter(|key| self.keyboard.is_key_held(*key))
                .collect();
            if held.is_empty() {
                return;
            }
            for key in held {
                self.send_key_up(key).await;
            }
            sleep(self.timing.modifier_poll_interval).await;
        }

        debug!(
            attempts = self.timing.modifier_poll_attempts,
            "Modifiers still held, copying anyway"
        );
    }

    async fn send_key_up(&self, key: Key) {
        if let Err(e) = self.keyboard.key_up(key).await {
            debug!(%key, error = %e, "Modifier release failed");
        }
    }

    async fn copy_selection(&self) -> Result<Option<String>, CaptureError> {
        // An empty clipboard tells a failed copy apart from stale content.
        if let Err(e) = self.clipboard.clear().await {
            warn!(error = %e, "Failed to clear clipboard");
        }

        self.send_copy_chord().await?;
        sleep(self.timing.settle_delay).await;

        let text = match self.clipboard.read_text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to read copied text");
                None
            }
        };

        Ok(text.filter(|t| !t.trim().is_empty()))
    }

    async fn send_copy_chord(&self) -> Result<(), KeyboardError> {
        let step = self.timing.key_step_delay;

        self.keyboard.key_down(Key::Control).await?;
        sleep(step).await;

        let tapped = self.tap(Key::C).await;
        sleep(step).await;

        // Control is released even when the tap failed.
        let released = self.keyboard.key_up(Key::Control).await;
        tapped.and(released)
    }

    async fn tap(&self, key: Key) -> Result<(), KeyboardError> {
        self.keyboard.key_down(key).await?;
        sleep(self.timing.key_step_delay).await;
        self.keyboard.key_up(key).await
    }

    async fn restore(&self, snapshot: Option<String>) {
        let restored = match snapshot {
            Some(text) => self.clipboard.write_text(&text).await,
            None => self.clipboard.clear().await,
        };
        if let Err(e) = restored {
            debug!(error = %e, "Clipboard restore failed");
        }
    }
}
