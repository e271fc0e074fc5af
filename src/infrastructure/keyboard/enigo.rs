//! Cross-platform key injection using enigo
//!
//! Works on Windows, macOS, and Linux (X11). One `Enigo` instance lives on a
//! dedicated thread, so a key pressed by one call stays down until a later
//! call releases it.

use std::sync::mpsc as std_mpsc;
use std::sync::Arc;

use async_trait::async_trait;
use enigo::{Direction, Enigo, Keyboard, Settings};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::modifiers::ModifierTracker;
use crate::application::ports::{Key, KeyInjector, KeyboardError};

struct KeyRequest {
    key: Key,
    direction: Direction,
    reply: oneshot::Sender<Result<(), KeyboardError>>,
}

/// Key injector backed by enigo, with held-key state from a tracker
pub struct EnigoKeyboard {
    requests: std_mpsc::Sender<KeyRequest>,
    modifiers: Arc<ModifierTracker>,
}

impl EnigoKeyboard {
    /// Spawn the injector thread. The enigo connection is opened on first use.
    pub fn new(modifiers: Arc<ModifierTracker>) -> Self {
        let (tx, rx) = std_mpsc::channel::<KeyRequest>();

        if let Err(e) = std::thread::Builder::new()
            .name("key-injector".to_string())
            .spawn(move || run_injector(rx))
        {
            warn!(error = %e, "Failed to start key injector thread");
        }

        Self {
            requests: tx,
            modifiers,
        }
    }

    async fn send(&self, key: Key, direction: Direction) -> Result<(), KeyboardError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(KeyRequest {
                key,
                direction,
                reply,
            })
            .map_err(|_| KeyboardError::Unavailable("key injector stopped".to_string()))?;

        response
            .await
            .map_err(|_| KeyboardError::Unavailable("key injector stopped".to_string()))?
    }
}

/// Keys pressed by one request must survive until a later request releases
/// them, so dropping the connection never releases anything.
fn injector_settings() -> Settings {
    Settings {
        release_keys_when_dropped: false,
        ..Settings::default()
    }
}

/// Injector thread: owns the enigo connection for as long as the keyboard lives
fn run_injector(requests: std_mpsc::Receiver<KeyRequest>) {
    let mut enigo: Option<Enigo> = None;

    while let Ok(KeyRequest {
        key,
        direction,
        reply,
    }) = requests.recv()
    {
        let _ = reply.send(inject(&mut enigo, key, direction));
    }

    debug!("Key injector thread exiting");
}

fn inject(enigo: &mut Option<Enigo>, key: Key, direction: Direction) -> Result<(), KeyboardError> {
    if enigo.is_none() {
        let connection =
            Enigo::new(&injector_settings()).map_err(|e| KeyboardError::Unavailable(e.to_string()))?;
        *enigo = Some(connection);
    }
    let Some(enigo) = enigo.as_mut() else {
        return Err(KeyboardError::Unavailable("enigo connection missing".to_string()));
    };

    enigo
        .key(to_enigo(key), direction)
        .map_err(|e| KeyboardError::InjectFailed {
            key,
            direction: direction_label(direction),
            message: e.to_string(),
        })
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Press => "down",
        Direction::Release => "up",
        Direction::Click => "click",
    }
}

fn to_enigo(key: Key) -> enigo::Key {
    match key {
        Key::Control => enigo::Key::Control,
        Key::Shift => enigo::Key::Shift,
        Key::Alt => enigo::Key::Alt,
        Key::C => enigo::Key::Unicode('c'),
    }
}

#[async_trait]
impl KeyInjector for EnigoKeyboard {
    async fn key_down(&self, key: Key) -> Result<(), KeyboardError> {
        self.send(key, Direction::Press).await
    }

    async fn key_up(&self, key: Key) -> Result<(), KeyboardError> {
        self.send(key, Direction::Release).await
    }

    fn is_key_held(&self, key: Key) -> bool {
        self.modifiers.is_held(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_state_comes_from_tracker() {
        let tracker = Arc::new(ModifierTracker::new());
        let keyboard = EnigoKeyboard::new(Arc::clone(&tracker));

        assert!(!keyboard.is_key_held(Key::Shift));
        tracker.set(Key::Shift, true);
        assert!(keyboard.is_key_held(Key::Shift));
    }

    #[test]
    fn held_keys_survive_the_connection() {
        assert!(!injector_settings().release_keys_when_dropped);
    }

    #[test]
    fn directions_have_labels() {
        assert_eq!(direction_label(Direction::Press), "down");
        assert_eq!(direction_label(Direction::Release), "up");
    }

    #[test]
    fn copy_key_maps_to_lowercase_c() {
        assert_eq!(to_enigo(Key::C), enigo::Key::Unicode('c'));
        assert_eq!(to_enigo(Key::Control), enigo::Key::Control);
    }
}
