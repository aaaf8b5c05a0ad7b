use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use validator::Validate;

/// Defaults read from the YAML config file. Every field may be overridden on
/// the command line.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[serde(default)]
    pub aws_access_key_id: Option<String>,

    #[serde(default)]
    pub aws_secret_access_key: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, message = "TTL must be greater than 0"))]
    pub ttl: Option<u32>,

    #[serde(default)]
    #[validate(url(message = "Endpoint must be a URL"))]
    pub endpoint: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, message = "Timeout must be greater than 0"))]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Validate)]
pub struct Credentials {
    #[validate(length(equal = 20, message = "AWS access key id must be 20 characters"))]
    pub access_key_id: String,

    #[validate(length(equal = 40, message = "AWS secret access key must be 40 characters"))]
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Values given explicitly on the command line (or its environment fallbacks).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub ttl: Option<u32>,
    pub endpoint: Option<String>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub credentials: Credentials,

    #[validate(range(min = 1, message = "TTL must be greater than 0"))]
    pub ttl: u32,

    #[validate(url(message = "Endpoint must be a URL"))]
    pub endpoint: String,

    pub timeout: Duration,
}
