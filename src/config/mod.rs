pub mod models;

use std::{fs::File, io::Read, path::Path, time::Duration};

use anyhow::Context;
use log::debug;
use validator::Validate;

use crate::api::route53::DEFAULT_ENDPOINT;
use crate::error::{DdnsError, Result};
pub use models::*;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const DEFAULT_TTL: u32 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file means "no defaults", not a parse error.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Loads the config file. A missing default file yields empty defaults; a
/// file named explicitly must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => read_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_config(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => {
            debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
            Ok(Config::default())
        }
    }
    .map_err(|e| DdnsError::InvalidArguments(format!("{e:#}")))?;

    config
        .validate()
        .map_err(|e| DdnsError::InvalidArguments(e.to_string()))?;
    Ok(config)
}

impl Settings {
    /// Merges command-line values over config-file defaults over built-in
    /// defaults, then checks the result before any network call is made.
    pub fn resolve(overrides: Overrides, config: Config) -> Result<Self> {
        let settings = Settings {
            credentials: Credentials {
                access_key_id: overrides
                    .access_key_id
                    .or(config.aws_access_key_id)
                    .unwrap_or_default(),
                secret_access_key: overrides
                    .secret_access_key
                    .or(config.aws_secret_access_key)
                    .unwrap_or_default(),
            },
            ttl: overrides.ttl.or(config.ttl).unwrap_or(DEFAULT_TTL),
            endpoint: overrides
                .endpoint
                .or(config.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        };

        settings
            .validate()
            .map_err(|e| DdnsError::InvalidArguments(e.to_string()))?;
        Ok(settings)
    }
}
