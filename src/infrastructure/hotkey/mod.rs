//! Global hotkey infrastructure module

mod rdev;

pub use self::rdev::RdevHotkeyListener;
