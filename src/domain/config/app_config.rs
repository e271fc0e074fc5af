//! Application configuration value object

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::service::{ServiceHandle, DEFAULT_CONTAINER_NAME, DEFAULT_IMAGE, DEFAULT_PORT};
use crate::domain::speech::{DEFAULT_MODEL, DEFAULT_VOICE};

/// Default double-press window in milliseconds
pub const DEFAULT_DOUBLE_PRESS_TIMEOUT_MS: u64 = 400;

/// Hotkey configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotkeyConfig {
    pub double_press_timeout_ms: Option<u64>,
}

/// Reader view configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub enabled: Option<bool>,
    pub auto_play: Option<bool>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub voice: Option<String>,
    pub model: Option<String>,
    pub port: Option<u16>,
    pub container_name: Option<String>,
    pub image: Option<String>,
    pub auto_start: Option<bool>,
    pub auto_stop: Option<bool>,
    pub notify: Option<bool>,
    pub hotkey: Option<HotkeyConfig>,
    pub reader: Option<ReaderConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            voice: Some(DEFAULT_VOICE.to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            port: Some(DEFAULT_PORT),
            container_name: Some(DEFAULT_CONTAINER_NAME.to_string()),
            image: Some(DEFAULT_IMAGE.to_string()),
            auto_start: Some(true),
            auto_stop: Some(true),
            notify: Some(true),
            hotkey: Some(HotkeyConfig {
                double_press_timeout_ms: Some(DEFAULT_DOUBLE_PRESS_TIMEOUT_MS),
            }),
            reader: Some(ReaderConfig {
                enabled: Some(true),
                auto_play: Some(true),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            voice: other.voice.or(self.voice),
            model: other.model.or(self.model),
            port: other.port.or(self.port),
            container_name: other.container_name.or(self.container_name),
            image: other.image.or(self.image),
            auto_start: other.auto_start.or(self.auto_start),
            auto_stop: other.auto_stop.or(self.auto_stop),
            notify: other.notify.or(self.notify),
            hotkey: Self::merge_hotkey_config(self.hotkey, other.hotkey),
            reader: Self::merge_reader_config(self.reader, other.reader),
        }
    }

    fn merge_hotkey_config(
        base: Option<HotkeyConfig>,
        other: Option<HotkeyConfig>,
    ) -> Option<HotkeyConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(HotkeyConfig {
                double_press_timeout_ms: o.double_press_timeout_ms.or(b.double_press_timeout_ms),
            }),
        }
    }

    fn merge_reader_config(
        base: Option<ReaderConfig>,
        other: Option<ReaderConfig>,
    ) -> Option<ReaderConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(ReaderConfig {
                enabled: o.enabled.or(b.enabled),
                auto_play: o.auto_play.or(b.auto_play),
            }),
        }
    }

    pub fn voice_or_default(&self) -> &str {
        self.voice.as_deref().unwrap_or(DEFAULT_VOICE)
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Get port, or the default if unset or zero
    pub fn port_or_default(&self) -> u16 {
        self.port.filter(|p| *p != 0).unwrap_or(DEFAULT_PORT)
    }

    pub fn container_name_or_default(&self) -> &str {
        self.container_name.as_deref().unwrap_or(DEFAULT_CONTAINER_NAME)
    }

    pub fn image_or_default(&self) -> &str {
        self.image.as_deref().unwrap_or(DEFAULT_IMAGE)
    }

    /// Get auto_start setting, or true if not set
    pub fn auto_start_or_default(&self) -> bool {
        self.auto_start.unwrap_or(true)
    }

    /// Get auto_stop setting, or true if not set
    pub fn auto_stop_or_default(&self) -> bool {
        self.auto_stop.unwrap_or(true)
    }

    /// Get notify setting, or true if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(true)
    }

    pub fn double_press_timeout(&self) -> Duration {
        let ms = self
            .hotkey
            .as_ref()
            .and_then(|h| h.double_press_timeout_ms)
            .unwrap_or(DEFAULT_DOUBLE_PRESS_TIMEOUT_MS);
        Duration::from_millis(ms)
    }

    /// Whether double-press opens the reader view
    pub fn reader_enabled_or_default(&self) -> bool {
        self.reader.as_ref().and_then(|r| r.enabled).unwrap_or(true)
    }

    pub fn reader_auto_play_or_default(&self) -> bool {
        self.reader.as_ref().and_then(|r| r.auto_play).unwrap_or(true)
    }

    /// Backend service handle described by this config
    pub fn service_handle(&self) -> ServiceHandle {
        ServiceHandle::new(
            self.container_name_or_default(),
            self.image_or_default(),
            self.port_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.voice, Some("af_heart".to_string()));
        assert_eq!(config.model, Some("kokoro".to_string()));
        assert_eq!(config.port, Some(8880));
        assert_eq!(config.container_name, Some("localtts-kokoro".to_string()));
        assert_eq!(config.auto_start, Some(true));
        assert_eq!(config.auto_stop, Some(true));
        assert_eq!(config.double_press_timeout(), Duration::from_millis(400));
        assert!(config.reader_enabled_or_default());
        assert!(config.reader_auto_play_or_default());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.voice.is_none());
        assert!(config.port.is_none());
        assert!(config.hotkey.is_none());
        assert!(config.reader.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            voice: Some("af_heart".to_string()),
            port: Some(8880),
            image: Some("base-image".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            voice: Some("bm_george".to_string()),
            port: None,
            image: Some("other-image".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.voice, Some("bm_george".to_string()));
        assert_eq!(merged.port, Some(8880));
        assert_eq!(merged.image, Some("other-image".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            auto_stop: Some(false),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());
        assert_eq!(merged.auto_stop, Some(false));
    }

    #[test]
    fn merge_nested_sections() {
        let base = AppConfig {
            hotkey: Some(HotkeyConfig {
                double_press_timeout_ms: Some(400),
            }),
            reader: Some(ReaderConfig {
                enabled: Some(true),
                auto_play: Some(true),
            }),
            ..Default::default()
        };
        let other = AppConfig {
            hotkey: Some(HotkeyConfig {
                double_press_timeout_ms: Some(250),
            }),
            reader: Some(ReaderConfig {
                enabled: None,
                auto_play: Some(false),
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.double_press_timeout(), Duration::from_millis(250));
        assert!(merged.reader_enabled_or_default());
        assert!(!merged.reader_auto_play_or_default());
    }

    #[test]
    fn zero_port_falls_back_to_default() {
        let config = AppConfig {
            port: Some(0),
            ..Default::default()
        };
        assert_eq!(config.port_or_default(), 8880);
    }

    #[test]
    fn service_handle_uses_configured_values() {
        let config = AppConfig {
            container_name: Some("my-tts".to_string()),
            port: Some(9001),
            ..Default::default()
        };
        let handle = config.service_handle();
        assert_eq!(handle.name(), "my-tts");
        assert_eq!(handle.port(), 9001);
        assert_eq!(handle.image(), DEFAULT_IMAGE);
    }

    #[test]
    fn boolean_defaults() {
        let config = AppConfig::empty();
        assert!(config.auto_start_or_default());
        assert!(config.auto_stop_or_default());
        assert!(config.notify_or_default());
    }
}
