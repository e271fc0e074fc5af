//! Keyboard infrastructure module
//!
//! Synthetic key events through enigo, physical modifier state through a
//! tracker fed by the global key listener.

mod enigo;
mod modifiers;

pub use self::enigo::EnigoKeyboard;
pub use modifiers::{ModifierState, ModifierTracker};
