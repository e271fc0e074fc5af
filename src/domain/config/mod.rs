//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, HotkeyConfig, ReaderConfig, DEFAULT_DOUBLE_PRESS_TIMEOUT_MS};
