use crate::api::models::HostedZone;
use crate::error::{DdnsError, Result};

use super::names::make_absolute;

/// True when `zone` is `domain` itself or one of its ancestors.
fn is_ancestor(zone: &str, domain: &str) -> bool {
    let zone = make_absolute(zone).to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();

    domain == zone
        || domain
            .strip_suffix(&zone)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Picks the most specific hosted zone containing `domain`. Callers pass
/// [`HostedZone::bare_id`] of the result to the record-set endpoints.
pub fn resolve_zone<'a>(zones: &'a [HostedZone], domain: &str) -> Result<&'a HostedZone> {
    zones
        .iter()
        .filter(|zone| is_ancestor(&zone.name, domain))
        .max_by_key(|zone| zone.name.len())
        .ok_or_else(|| DdnsError::NoMatchingZone(domain.to_string()))
}
