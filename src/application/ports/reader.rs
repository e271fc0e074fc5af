//! Reader view port interface

use thiserror::Error;

use crate::domain::alignment::RenderedToken;

/// Reader errors
#[derive(Debug, Clone, Error)]
pub enum ReaderError {
    #[error("Failed to render reader view: {0}")]
    Render(String),
}

/// Port for the surface that displays text and the highlight cursor
pub trait ReaderSurface: Send + Sync {
    /// Display a freshly tokenized text, dropping any previous one.
    fn show_text(&self, tokens: &[RenderedToken]) -> Result<(), ReaderError>;

    /// Move the highlight to a token, or clear it.
    fn set_highlight(&self, token: Option<usize>) -> Result<(), ReaderError>;
}

/// Reader that displays nothing, for the hotkey-only daemon
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReader;

impl ReaderSurface for NoopReader {
    fn show_text(&self, _tokens: &[RenderedToken]) -> Result<(), ReaderError> {
        Ok(())
    }

    fn set_highlight(&self, _token: Option<usize>) -> Result<(), ReaderError> {
        Ok(())
    }
}
