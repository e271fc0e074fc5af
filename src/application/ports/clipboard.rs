//! Clipboard port interface

use async_trait::async_trait;
use thiserror::Error;

/// Clipboard errors
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read clipboard: {0}")]
    ReadFailed(String),

    #[error("Failed to write clipboard: {0}")]
    WriteFailed(String),
}

/// Port for the system clipboard, used as a scratch area during capture
#[async_trait]
pub trait ClipboardBridge: Send + Sync + 'static {
    /// Read the clipboard's text content.
    ///
    /// # Returns
    /// `Ok(None)` when the clipboard holds no text
    async fn read_text(&self) -> Result<Option<String>, ClipboardError>;

    /// Replace the clipboard content with text.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Remove any content from the clipboard.
    async fn clear(&self) -> Result<(), ClipboardError>;
}

/// Blanket implementation for boxed clipboard types
#[async_trait]
impl ClipboardBridge for Box<dyn ClipboardBridge> {
    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.as_ref().read_text().await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.as_ref().write_text(text).await
    }

    async fn clear(&self) -> Result<(), ClipboardError> {
        self.as_ref().clear().await
    }
}
