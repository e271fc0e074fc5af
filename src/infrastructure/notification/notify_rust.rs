//! Cross-platform notification adapter using notify-rust
//!
//! Works on Windows, macOS, and Linux.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{NotificationError, NotificationIcon, Notifier};

/// How long a notice stays on screen
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Cross-platform notifier using notify-rust
pub struct NotifyRustNotifier {
    app_name: String,
    timeout: Duration,
}

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self {
            app_name: "LocalTTS".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::new()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for NotifyRustNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(
        &self,
        title: &str,
        message: &str,
        icon: NotificationIcon,
    ) -> Result<(), NotificationError> {
        let title = title.to_owned();
        let message = message.to_owned();
        let app_name = self.app_name.clone();
        let icon_name = icon.icon_name();
        let timeout = notify_rust::Timeout::Milliseconds(self.timeout.as_millis() as u32);

        // notify-rust talks to the desktop bus synchronously
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname(&app_name)
                .summary(&title)
                .body(&message)
                .icon(icon_name)
                .timeout(timeout)
                .show()
                .map_err(|e| NotificationError::SendFailed(e.to_string()))?;

            Ok(())
        })
        .await
        .map_err(|e| NotificationError::SendFailed(format!("Task join error: {}", e)))?
    }
}
