//! Hotkey press classification types

mod intent;

pub use intent::{HotkeyAction, HotkeyEvent, PressDecision, PressIntent};
