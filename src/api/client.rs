use super::models::*;
use anyhow::Result;
use async_trait::async_trait;

/// Zone-management operations the reconciler needs from a DNS provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsApiClient: Send + Sync {
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>>;

    /// Record sets in ascending name order, starting at or after
    /// `start_name`. Names past `start_name` are included too.
    async fn list_record_sets(&self, zone_id: &str, start_name: &str)
        -> Result<Vec<ResourceRecord>>;

    /// Applies every change or none of them.
    async fn submit_change_batch(&self, zone_id: &str, changes: &ChangeSet) -> Result<ChangeInfo>;
}
