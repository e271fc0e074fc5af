//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, HotkeyConfig, ReaderConfig};
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    let value = read_value(&config, key);
    presenter.output(value.as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = read_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "voice" => config.voice = Some(non_empty(key, value)?),
        "model" => config.model = Some(non_empty(key, value)?),
        "container_name" => config.container_name = Some(non_empty(key, value)?),
        "image" => config.image = Some(non_empty(key, value)?),
        "port" => config.port = Some(parse_port(key, value)?),
        "auto_start" => config.auto_start = Some(parse_bool_value(key, value)?),
        "auto_stop" => config.auto_stop = Some(parse_bool_value(key, value)?),
        "notify" => config.notify = Some(parse_bool_value(key, value)?),
        "hotkey.double_press_timeout_ms" => {
            let ms = value
                .parse::<u64>()
                .map_err(|_| invalid(key, "Value must be a whole number of milliseconds"))?;
            config
                .hotkey
                .get_or_insert_with(HotkeyConfig::default)
                .double_press_timeout_ms = Some(ms);
        }
        "reader.enabled" => {
            config.reader.get_or_insert_with(ReaderConfig::default).enabled =
                Some(parse_bool_value(key, value)?);
        }
        "reader.auto_play" => {
            config.reader.get_or_insert_with(ReaderConfig::default).auto_play =
                Some(parse_bool_value(key, value)?);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "voice" => config.voice.clone(),
        "model" => config.model.clone(),
        "port" => config.port.map(|p| p.to_string()),
        "container_name" => config.container_name.clone(),
        "image" => config.image.clone(),
        "auto_start" => config.auto_start.map(|b| b.to_string()),
        "auto_stop" => config.auto_stop.map(|b| b.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        "hotkey.double_press_timeout_ms" => config
            .hotkey
            .as_ref()
            .and_then(|h| h.double_press_timeout_ms)
            .map(|ms| ms.to_string()),
        "reader.enabled" => config
            .reader
            .as_ref()
            .and_then(|r| r.enabled)
            .map(|b| b.to_string()),
        "reader.auto_play" => config
            .reader
            .as_ref()
            .and_then(|r| r.auto_play)
            .map(|b| b.to_string()),
        _ => None,
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(invalid(key, "Value must not be empty"))
    } else {
        Ok(value.to_string())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    match value.parse::<u16>() {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(invalid(key, "Port must be between 1 and 65535")),
    }
}

fn parse_bool_value(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}
