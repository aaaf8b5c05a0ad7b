use thiserror::Error;

/// Fatal conditions of a reconciliation run. Every variant ends the process
/// with a non-zero status.
#[derive(Debug, Error)]
pub enum DdnsError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unable to determine domain name from hostname {0:?}")]
    InvalidHostname(String),

    #[error("no hosted zones found for {0:?}")]
    NoMatchingZone(String),

    #[error("DNS provider request failed: {0:#}")]
    Provider(#[from] anyhow::Error),
}

pub type Result<T, E = DdnsError> = std::result::Result<T, E>;
