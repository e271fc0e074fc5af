//! Physical modifier key state
//!
//! Synthetic injection libraries cannot ask the OS which keys are held, so
//! the global key listener records modifier transitions here.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ports::Key;

/// Snapshot of which modifiers are held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ModifierState {
    /// Check if all modifiers are released
    pub fn is_empty(&self) -> bool {
        !self.control && !self.shift && !self.alt
    }

    /// Check if exactly Control + Shift are held (the hotkey chord)
    pub fn is_control_shift(&self) -> bool {
        self.control && self.shift && !self.alt
    }
}

/// Live modifier state shared between the listener thread and the injector
#[derive(Debug, Default)]
pub struct ModifierTracker {
    control: AtomicBool,
    shift: AtomicBool,
    alt: AtomicBool,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, key: Key) -> Option<&AtomicBool> {
        match key {
            Key::Control => Some(&self.control),
            Key::Shift => Some(&self.shift),
            Key::Alt => Some(&self.alt),
            Key::C => None,
        }
    }

    /// Record a modifier press or release. Non-modifiers are ignored.
    pub fn set(&self, key: Key, held: bool) {
        if let Some(flag) = self.flag(key) {
            flag.store(held, Ordering::Release);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.flag(key).is_some_and(|f| f.load(Ordering::Acquire))
    }

    pub fn state(&self) -> ModifierState {
        ModifierState {
            control: self.is_held(Key::Control),
            shift: self.is_held(Key::Shift),
            alt: self.is_held(Key::Alt),
        }
    }
}
