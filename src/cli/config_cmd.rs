//! Config command handler

use std::net::{IpAddr, Ipv4Addr};

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, NetworkConfig};
use crate::domain::error::ConfigError;
use crate::domain::Duration;

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

    let stored = read_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
    presenter.success(&format!("{} = {}", key, stored));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    match read_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        let value = read_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
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

/// Validate `value` and store it under `key`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };
    let value = value.trim();

    match key {
        "port" => {
            let port: u16 = value
                .parse()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| invalid("Value must be a port between 1 and 65535".to_string()))?;
            config.port = Some(port);
        }
        "bind" => {
            let ip: IpAddr = value
                .parse()
                .map_err(|_| invalid(format!("'{}' is not an IP address", value)))?;
            config.bind = Some(ip.to_string());
        }
        "advertise_ip" => {
            let ip: Ipv4Addr = value
                .parse()
                .map_err(|_| invalid(format!("'{}' is not an IPv4 address", value)))?;
            config.advertise_ip = Some(ip.to_string());
        }
        "helper_timeout" => {
            let timeout: Duration = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            config.helper_timeout = Some(timeout.to_string());
        }
        "max_upload_mb" => {
            let mb: u64 = value
                .parse()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or_else(|| {
                    invalid("Value must be a positive number of megabytes".to_string())
                })?;
            config.max_upload_mb = Some(mb);
        }
        "notify" => {
            config.notify = Some(parse_bool(value).map_err(|_| invalid(bool_message()))?);
        }
        "qr" => {
            config.qr = Some(parse_bool(value).map_err(|_| invalid(bool_message()))?);
        }
        "network.wireless_keywords" => {
            network_mut(config).wireless_keywords = Some(parse_list(value));
        }
        "network.virtual_keywords" => {
            network_mut(config).virtual_keywords = Some(parse_list(value));
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }

    Ok(())
}

/// Current value of `key` as display text
fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    let network = config.network.as_ref();
    match key {
        "port" => config.port.map(|p| p.to_string()),
        "bind" => config.bind.clone(),
        "advertise_ip" => config.advertise_ip.clone(),
        "helper_timeout" => config.helper_timeout.clone(),
        "max_upload_mb" => config.max_upload_mb.map(|mb| mb.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        "qr" => config.qr.map(|b| b.to_string()),
        "network.wireless_keywords" => network
            .and_then(|n| n.wireless_keywords.as_ref())
            .map(|list| list.join(", ")),
        "network.virtual_keywords" => network
            .and_then(|n| n.virtual_keywords.as_ref())
            .map(|list| list.join(", ")),
        _ => None,
    }
}

fn network_mut(config: &mut AppConfig) -> &mut NetworkConfig {
    config.network.get_or_insert_with(NetworkConfig::default)
}

/// Split a comma-separated keyword list
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn bool_message() -> String {
    "Value must be 'true' or 'false'".to_string()
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}
