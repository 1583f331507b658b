mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub async fn load() -> Result<Config> {
    let explicit_path = env::var("CONFIG_PATH").ok();
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    debug!("Loading configuration from: {}", config_path);

    let config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => parse(&config_str)?,
        // Only the implicit default path may be absent.
        Err(e) if e.kind() == ErrorKind::NotFound && explicit_path.is_none() => {
            debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    apply_env_overrides(config, |key| env::var(key).ok())
}

pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    Ok(config)
}

/// Applies `PORT`, `MODEL_PATH` and `KEEPALIVE_URL` on top of `config`.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("PORT is not a valid port number: '{}'", port)))?;
    }

    if let Some(path) = lookup("MODEL_PATH") {
        config.model.path = path;
    }

    if let Some(url) = lookup("KEEPALIVE_URL") {
        config.keepalive.url = Some(url).filter(|u| !u.trim().is_empty());
    }

    if config.keepalive.interval_secs == 0 {
        return Err(Error::config("keepalive.interval_secs must be greater than zero"));
    }

    Ok(config)
}
