use std::{net::Ipv4Addr, str::FromStr};

use crate::api::models::RecordType;
use crate::error::{DdnsError, Result};

/// Label prepended to the parent domain to form the soft-delete target.
pub const UNREG_LABEL: &str = "unreg";

/// Appends the root dot so no record is ever created relative to a zone.
pub fn make_absolute(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Strips the leftmost label of an absolute hostname.
///
/// The remaining domain must itself have at least two labels: a name directly
/// under a top-level domain, or a bare top-level name, has no domain that can
/// be reconciled.
pub fn parent_domain(hostname: &str) -> Result<String> {
    let invalid = || DdnsError::InvalidHostname(hostname.to_string());

    let labels: Vec<&str> = hostname
        .strip_suffix('.')
        .unwrap_or(hostname)
        .split('.')
        .collect();
    if labels.len() < 3 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(format!("{}.", labels[1..].join(".")))
}

/// Decides the record to point `hostname` at.
///
/// Deletion re-points the name at `unreg.<domain>` instead of removing it, which
/// keeps negative caching governed by the zone's TTL and leaves a visible trace
/// of hosts that registered and went away.
pub fn classify_target(
    delete: bool,
    target: Option<&str>,
    domain: &str,
) -> Result<(String, RecordType)> {
    if delete {
        return Ok((format!("{UNREG_LABEL}.{domain}"), RecordType::Cname));
    }

    let target = target
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DdnsError::InvalidArguments("a target is required".to_string()))?;

    let record_type = match Ipv4Addr::from_str(target) {
        Ok(_) => RecordType::A,
        Err(_) => RecordType::Cname,
    };
    Ok((target.to_string(), record_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_absolute_is_idempotent() {
        for name in ["host.example.com", "host.example.com.", "localhost", ""] {
            let once = make_absolute(name);
            assert!(once.ends_with('.'));
            assert_eq!(make_absolute(&once), once);
        }
        assert_eq!(make_absolute("host.example.com"), "host.example.com.");
    }

    #[test]
    fn parent_domain_strips_first_label() {
        assert_eq!(parent_domain("host.example.com.").unwrap(), "example.com.");
        assert_eq!(
            parent_domain("a.b.foo.example.com.").unwrap(),
            "b.foo.example.com."
        );
    }

    #[test]
    fn parent_domain_rejects_short_names() {
        for name in ["example.com.", "com.", ".", "", "host..com.", ".example.com."] {
            assert!(
                matches!(parent_domain(name), Err(DdnsError::InvalidHostname(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn ipv4_target_is_a_record() {
        let (target, record_type) =
            classify_target(false, Some("10.0.0.1"), "example.com.").unwrap();
        assert_eq!(target, "10.0.0.1");
        assert_eq!(record_type, RecordType::A);
    }

    #[test]
    fn hostname_target_is_cname() {
        let (target, record_type) =
            classify_target(false, Some("web.example.com."), "example.com.").unwrap();
        assert_eq!(target, "web.example.com.");
        assert_eq!(record_type, RecordType::Cname);

        // Not dotted-decimal, so not an address.
        let (_, record_type) = classify_target(false, Some("10.1"), "example.com.").unwrap();
        assert_eq!(record_type, RecordType::Cname);
    }

    #[test]
    fn delete_points_at_unreg_sentinel() {
        let domain = parent_domain("host.example.com.").unwrap();
        for target in [None, Some("10.0.0.1"), Some("web.example.com.")] {
            let (effective, record_type) = classify_target(true, target, &domain).unwrap();
            assert_eq!(effective, "unreg.example.com.");
            assert_eq!(record_type, RecordType::Cname);
        }
    }

    #[test]
    fn missing_target_is_rejected() {
        assert!(matches!(
            classify_target(false, None, "example.com."),
            Err(DdnsError::InvalidArguments(_))
        ));
    }
}
