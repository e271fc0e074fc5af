//! Global hotkey support using rdev
//!
//! Listens to every key event on a dedicated thread, records modifier
//! transitions for the key injector, and reports Ctrl+Shift+R presses.
//! On Wayland compositors that block global capture, bind
//! `local-tts press` to a shortcut instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rdev::{listen, Event, EventType};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::application::ports::Key;
use crate::domain::hotkey::HotkeyEvent;
use crate::infrastructure::keyboard::ModifierTracker;

/// The trigger key of the Ctrl+Shift chord
const TRIGGER_KEY: rdev::Key = rdev::Key::KeyR;

/// rdev-based global hotkey listener
pub struct RdevHotkeyListener {
    modifiers: Arc<ModifierTracker>,
    running: Arc<AtomicBool>,
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl RdevHotkeyListener {
    pub fn new(modifiers: Arc<ModifierTracker>) -> Self {
        Self {
            modifiers,
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Start listening. Presses are delivered on the returned channel.
    pub fn start(&mut self) -> mpsc::UnboundedReceiver<HotkeyEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let modifiers = Arc::clone(&self.modifiers);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        let thread_handle = std::thread::spawn(move || {
            let mut chord = ChordDetector::new(modifiers);

            let callback = move |event: Event| {
                if !running.load(Ordering::SeqCst) {
                    return;
                }
                if chord.on_event(&event.event_type) {
                    debug!("Hotkey pressed");
                    let _ = tx.send(HotkeyEvent);
                }
            };

            // Blocks until an error occurs or the process exits
            if let Err(e) = listen(callback) {
                error!("rdev listen error: {:?}", e);
                warn!("Global hotkey capture failed; bind `local-tts press` to a shortcut instead");
            }
        });

        self.thread_handle = Some(thread_handle);
        rx
    }

    /// Stop reporting presses.
    ///
    /// rdev cannot be stopped from another thread; the listener thread
    /// keeps running until the process exits but goes silent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for RdevHotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn modifier_for(key: rdev::Key) -> Option<Key> {
    match key {
        rdev::Key::ControlLeft | rdev::Key::ControlRight => Some(Key::Control),
        rdev::Key::ShiftLeft | rdev::Key::ShiftRight => Some(Key::Shift),
        rdev::Key::Alt | rdev::Key::AltGr => Some(Key::Alt),
        _ => None,
    }
}

/// Tracks modifiers and turns Ctrl+Shift+R into single presses
struct ChordDetector {
    modifiers: Arc<ModifierTracker>,
    trigger_down: bool,
}

impl ChordDetector {
    fn new(modifiers: Arc<ModifierTracker>) -> Self {
        Self {
            modifiers,
            trigger_down: false,
        }
    }

    /// Returns true when the event completes a hotkey press
    fn on_event(&mut self, event: &EventType) -> bool {
        match *event {
            EventType::KeyPress(key) => {
                if let Some(modifier) = modifier_for(key) {
                    self.modifiers.set(modifier, true);
                    return false;
                }
                if key != TRIGGER_KEY {
                    return false;
                }
                // Auto-repeat sends presses while the key is held
                let repeat = std::mem::replace(&mut self.trigger_down, true);
                !repeat && self.modifiers.state().is_control_shift()
            }
            EventType::KeyRelease(key) => {
                if let Some(modifier) = modifier_for(key) {
                    self.modifiers.set(modifier, false);
                } else if key == TRIGGER_KEY {
                    self.trigger_down = false;
                }
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> (ChordDetector, Arc<ModifierTracker>) {
        let tracker = Arc::new(ModifierTracker::new());
        (ChordDetector::new(Arc::clone(&tracker)), tracker)
    }

    fn press(key: rdev::Key) -> EventType {
        EventType::KeyPress(key)
    }

    fn release(key: rdev::Key) -> EventType {
        EventType::KeyRelease(key)
    }

    #[test]
    fn chord_fires_once() {
        let (mut d, _) = detector();
        assert!(!d.on_event(&press(rdev::Key::ControlLeft)));
        assert!(!d.on_event(&press(rdev::Key::ShiftRight)));
        assert!(d.on_event(&press(rdev::Key::KeyR)));
    }

    #[test]
    fn auto_repeat_is_ignored() {
        let (mut d, _) = detector();
        d.on_event(&press(rdev::Key::ControlLeft));
        d.on_event(&press(rdev::Key::ShiftLeft));
        assert!(d.on_event(&press(rdev::Key::KeyR)));
        assert!(!d.on_event(&press(rdev::Key::KeyR)));
        d.on_event(&release(rdev::Key::KeyR));
        assert!(d.on_event(&press(rdev::Key::KeyR)));
    }

    #[test]
    fn trigger_without_modifiers_does_nothing() {
        let (mut d, _) = detector();
        assert!(!d.on_event(&press(rdev::Key::KeyR)));
    }

    #[test]
    fn extra_alt_does_not_fire() {
        let (mut d, _) = detector();
        d.on_event(&press(rdev::Key::ControlLeft));
        d.on_event(&press(rdev::Key::ShiftLeft));
        d.on_event(&press(rdev::Key::Alt));
        assert!(!d.on_event(&press(rdev::Key::KeyR)));
    }

    #[test]
    fn modifier_transitions_reach_tracker() {
        let (mut d, tracker) = detector();
        d.on_event(&press(rdev::Key::ControlRight));
        assert!(tracker.is_held(Key::Control));
        d.on_event(&release(rdev::Key::ControlRight));
        assert!(!tracker.is_held(Key::Control));
    }
}
