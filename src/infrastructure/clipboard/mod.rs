//! Clipboard infrastructure module
//!
//! Provides cross-platform clipboard access using arboard.

mod arboard;

pub use arboard::ArboardClipboard;
