//! Notification infrastructure module
//!
//! Transient desktop notifications via notify-rust.

mod notify_rust;

pub use notify_rust::NotifyRustNotifier;
