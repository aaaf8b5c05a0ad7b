pub mod names;
pub mod zone;

use log::{debug, info};

use crate::api::{models::*, DnsApiClient};
use crate::error::Result;

pub use names::{classify_target, make_absolute, parent_domain};
pub use zone::resolve_zone;

/// What the operator asked for on one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub fqdn: String,
    pub target: Option<String>,
    pub ttl: u32,
    pub delete: bool,
}

impl UpdateRequest {
    /// Parent domain of the hostname, and the single record the hostname
    /// should carry.
    ///
    /// Route 53 reports record names in lowercase, so the hostname is folded
    /// to match before any comparison.
    pub fn desired_record(&self) -> Result<(String, ResourceRecord)> {
        let hostname = make_absolute(&self.fqdn).to_ascii_lowercase();
        let domain = parent_domain(&hostname)?;
        let (target, record_type) = classify_target(self.delete, self.target.as_deref(), &domain)?;

        let record = ResourceRecord::single(hostname, record_type, self.ttl, target);
        Ok((domain, record))
    }
}

pub struct Route53Ddns<C> {
    client: C,
    dry_run: bool,
}

impl<C: DnsApiClient> Route53Ddns<C> {
    pub fn new(client: C, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Bare ID of the most specific hosted zone that contains `domain`.
    pub async fn find_zone_id(&self, domain: &str) -> Result<String> {
        let zones = self.client.list_hosted_zones().await?;
        let zone = resolve_zone(&zones, domain)?;

        debug!("Using hosted zone {} ({})", zone.name, zone.bare_id());
        Ok(zone.bare_id().to_string())
    }

    /// Minimal changes that leave `desired` as the only record at its name.
    pub async fn reconcile(&self, zone_id: &str, desired: &ResourceRecord) -> Result<ChangeSet> {
        let hostname = desired.name.as_str();

        // The listing starts at `hostname` but runs on past it in name order,
        // so only exact matches belong to this name.
        let existing = self
            .client
            .list_record_sets(zone_id, hostname)
            .await?
            .into_iter()
            .filter(|record| record.name == hostname);

        let mut changes = ChangeSet::new();
        let mut desired_exists = false;

        for record in existing {
            if record == *desired {
                desired_exists = true;
            } else {
                // Deletions must name the record exactly, values and TTL included.
                changes.delete(record);
            }
        }

        if !desired_exists {
            changes.create(desired.clone());
        }
        Ok(changes)
    }

    /// Submits `changes` as one batch. Returns `None` when nothing was sent.
    pub async fn submit(&self, zone_id: &str, changes: &ChangeSet) -> Result<Option<ChangeInfo>> {
        if changes.is_empty() {
            return Ok(None);
        }

        for line in changes.to_string().lines() {
            info!("{}", line);
        }
        match serde_json::to_string(changes) {
            Ok(json) => debug!("Change batch: {}", json),
            Err(e) => debug!("Change batch not renderable as JSON: {}", e),
        }

        if self.dry_run {
            info!("Dry run, not submitting {} change(s)", changes.len());
            return Ok(None);
        }

        let change = self.client.submit_change_batch(zone_id, changes).await?;
        info!("Submitted change {} ({})", change.id, change.status);
        Ok(Some(change))
    }

    pub async fn run(&self, request: &UpdateRequest) -> Result<ChangeSet> {
        let (domain, desired) = request.desired_record()?;

        let zone_id = self.find_zone_id(&domain).await?;
        let changes = self.reconcile(&zone_id, &desired).await?;

        if changes.is_empty() {
            info!("Record already up to date: {}", desired);
        }
        self.submit(&zone_id, &changes).await?;
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(fqdn: &str, target: Option<&str>, delete: bool) -> UpdateRequest {
        UpdateRequest {
            fqdn: fqdn.to_string(),
            target: target.map(str::to_string),
            ttl: 60,
            delete,
        }
    }

    #[test]
    fn desired_record_folds_hostname_case() {
        let (domain, record) = request("Host.Example.COM", Some("10.0.0.1"), false)
            .desired_record()
            .unwrap();
        assert_eq!(domain, "example.com.");
        assert_eq!(
            record,
            ResourceRecord::single("host.example.com.", RecordType::A, 60, "10.0.0.1")
        );
    }

    #[test]
    fn desired_record_keeps_cname_target() {
        let (_, record) = request("host.example.com.", Some("Web.Example.com."), false)
            .desired_record()
            .unwrap();
        assert_eq!(record.record_type, RecordType::Cname);
        assert_eq!(record.values, vec!["Web.Example.com.".to_string()]);
    }

    #[test]
    fn desired_record_for_delete_uses_lowercase_domain() {
        let (domain, record) = request("HOST.Example.com", None, true)
            .desired_record()
            .unwrap();
        assert_eq!(domain, "example.com.");
        assert_eq!(record.name, "host.example.com.");
        assert_eq!(record.values, vec!["unreg.example.com.".to_string()]);
    }
}
