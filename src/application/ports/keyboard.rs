//! Keyboard injection port interface

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Keyboard errors
#[derive(Debug, Clone, Error)]
pub enum KeyboardError {
    #[error("Keyboard injection unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to send {key} {direction}: {message}")]
    InjectFailed {
        key: Key,
        direction: &'static str,
        message: String,
    },
}

/// Keys the capture sequence needs to press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Control,
    Shift,
    Alt,
    /// The `C` key of the copy chord
    C,
}

impl Key {
    /// Modifiers that must be up before a synthetic copy
    pub const MODIFIERS: [Key; 3] = [Key::Control, Key::Shift, Key::Alt];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Control => "ctrl",
            Self::Shift => "shift",
            Self::Alt => "alt",
            Self::C => "c",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Port for synthetic key events and physical key state
#[async_trait]
pub trait KeyInjector: Send + Sync + 'static {
    /// Send a synthetic key-down event.
    async fn key_down(&self, key: Key) -> Result<(), KeyboardError>;

    /// Send a synthetic key-up event.
    async fn key_up(&self, key: Key) -> Result<(), KeyboardError>;

    /// Whether the key is currently physically held.
    fn is_key_held(&self, key: Key) -> bool;
}

/// Blanket implementation for boxed keyboard types
#[async_trait]
impl KeyInjector for Box<dyn KeyInjector> {
    async fn key_down(&self, key: Key) -> Result<(), KeyboardError> {
        self.as_ref().key_down(key).await
    }

    async fn key_up(&self, key: Key) -> Result<(), KeyboardError> {
        self.as_ref().key_up(key).await
    }

    fn is_key_held(&self, key: Key) -> bool {
        self.as_ref().is_key_held(key)
    }
}
