//! Cross-platform clipboard adapter using arboard
//!
//! Works on Windows, macOS, and Linux (X11/Wayland).

use std::sync::mpsc as std_mpsc;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{ClipboardBridge, ClipboardError};

type ClipboardJob = Box<dyn FnOnce(&mut Option<arboard::Clipboard>) + Send>;

/// Cross-platform clipboard adapter using arboard.
///
/// One handle lives on a dedicated thread for as long as the adapter does.
/// On X11 the owner of a selection must keep serving it, so text written by
/// a restore stays available after the call returns.
pub struct ArboardClipboard {
    jobs: std_mpsc::Sender<ClipboardJob>,
}

impl ArboardClipboard {
    /// Spawn the clipboard thread. The handle is opened on first use.
    pub fn new() -> Self {
        let (tx, rx) = std_mpsc::channel::<ClipboardJob>();

        if let Err(e) = std::thread::Builder::new()
            .name("clipboard".to_string())
            .spawn(move || run_clipboard(rx))
        {
            warn!(error = %e, "Failed to start clipboard thread");
        }

        Self { jobs: tx }
    }

    /// Run a clipboard operation on the clipboard thread
    async fn with_clipboard<T, F>(&self, op: F) -> Result<T, ClipboardError>
    where
        T: Send + 'static,
        F: FnOnce(&mut arboard::Clipboard) -> Result<T, ClipboardError> + Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: ClipboardJob = Box::new(move |handle: &mut Option<arboard::Clipboard>| {
            let _ = reply.send(open(handle).and_then(op));
        });

        self.jobs
            .send(job)
            .map_err(|_| ClipboardError::Unavailable("clipboard thread stopped".to_string()))?;
        response
            .await
            .map_err(|_| ClipboardError::Unavailable("clipboard thread stopped".to_string()))?
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Clipboard thread: owns the handle until the adapter is dropped
fn run_clipboard(jobs: std_mpsc::Receiver<ClipboardJob>) {
    let mut handle: Option<arboard::Clipboard> = None;

    while let Ok(job) = jobs.recv() {
        job(&mut handle);
    }

    debug!("Clipboard thread exiting");
}

fn open(handle: &mut Option<arboard::Clipboard>) -> Result<&mut arboard::Clipboard, ClipboardError> {
    if handle.is_none() {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        *handle = Some(clipboard);
    }
    handle
        .as_mut()
        .ok_or_else(|| ClipboardError::Unavailable("clipboard handle missing".to_string()))
}

#[async_trait]
impl ClipboardBridge for ArboardClipboard {
    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.with_clipboard(|clipboard| match clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::ReadFailed(e.to_string())),
        })
        .await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_owned();
        self.with_clipboard(move |clipboard| {
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
        })
        .await
    }

    async fn clear(&self) -> Result<(), ClipboardError> {
        self.with_clipboard(|clipboard| {
            clipboard
                .clear()
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
        })
        .await
    }
}
