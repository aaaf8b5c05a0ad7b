use clap::Parser;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::ddns::UpdateRequest;
use crate::error::{DdnsError, Result};

/// Point a Route 53 hostname at an IPv4 address (A) or another name (CNAME).
#[derive(Debug, Parser)]
#[command(name = "route53-ddns", version)]
pub struct Cli {
    /// Hostname to reconcile
    pub fqdn: String,

    /// IPv4 address or hostname to point at; omitted with --delete
    pub target: Option<String>,

    /// AWS access key id
    #[arg(short, long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub key: Option<String>,

    /// AWS secret access key
    #[arg(short, long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret: Option<String>,

    /// Record TTL in seconds [default: 60]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub ttl: Option<u32>,

    /// Re-point the record at unreg.<domain> instead of a target
    #[arg(short, long)]
    pub delete: bool,

    /// Log the change set
    #[arg(short, long)]
    pub verbose: bool,

    /// YAML config file with credential and TTL defaults
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Route 53 API endpoint
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Compute the change set without submitting it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn check_arity(&self) -> Result<()> {
        match (self.delete, &self.target) {
            (true, Some(_)) => Err(DdnsError::InvalidArguments(
                "--delete takes only FQDN".to_string(),
            )),
            (false, None) => Err(DdnsError::InvalidArguments(
                "TARGET is required unless --delete is given".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            access_key_id: self.key.clone(),
            secret_access_key: self.secret.clone(),
            ttl: self.ttl,
            endpoint: self.endpoint.clone(),
        }
    }

    pub fn request(&self, ttl: u32) -> UpdateRequest {
        UpdateRequest {
            fqdn: self.fqdn.clone(),
            target: self.target.clone(),
            ttl,
            delete: self.delete,
        }
    }
}
