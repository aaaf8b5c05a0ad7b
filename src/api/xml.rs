//! Route 53 REST API wire types (API version 2013-04-01)

use serde::{Deserialize, Serialize};

use super::models::{ChangeSet, HostedZone, RecordType, ResourceRecord};

pub(crate) const XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

// ==================== Responses ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ListHostedZonesResponse {
    #[serde(default)]
    pub hosted_zones: HostedZones,
    pub is_truncated: bool,
    #[serde(default)]
    pub next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HostedZones {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<HostedZoneXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct HostedZoneXml {
    pub id: String,
    pub name: String,
}

impl From<HostedZoneXml> for HostedZone {
    fn from(zone: HostedZoneXml) -> Self {
        HostedZone {
            id: zone.id,
            name: zone.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ListResourceRecordSetsResponse {
    #[serde(default)]
    pub resource_record_sets: ResourceRecordSets,
    #[serde(default)]
    pub is_truncated: bool,
    #[serde(default)]
    pub next_record_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResourceRecordSets {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<ResourceRecordSetXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ResourceRecordSetXml {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL", default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub set_identifier: Option<String>,
    #[serde(default)]
    pub resource_records: Option<ResourceRecordsXml>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResourceRecordsXml {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<ResourceRecordXml>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ResourceRecordXml {
    pub value: String,
}

impl ResourceRecordSetXml {
    /// Plain record sets only. Alias and routing-policy sets cannot be
    /// named exactly in a DELETE without fields this model does not carry.
    pub fn into_record(self) -> Option<ResourceRecord> {
        if self.set_identifier.is_some() {
            return None;
        }
        let ttl = self.ttl?;
        let values = self
            .resource_records?
            .items
            .into_iter()
            .map(|rr| rr.value)
            .collect();
        let record_type = self
            .record_type
            .parse::<RecordType>()
            .unwrap_or_else(|never| match never {});

        Some(ResourceRecord {
            name: self.name,
            record_type,
            ttl,
            values,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ChangeResourceRecordSetsResponse {
    pub change_info: ChangeInfoXml,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ChangeInfoXml {
    pub id: String,
    pub status: String,
}

/// Covers both `<ErrorResponse>` and `<InvalidChangeBatch>` bodies.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub messages: Option<ErrorMessages>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorMessages {
    #[serde(rename = "Message", default)]
    pub items: Vec<String>,
}

impl ErrorResponse {
    pub fn describe(&self) -> Option<String> {
        if let Some(error) = &self.error {
            let code = error.code.as_deref().unwrap_or("Unknown");
            let message = error.message.as_deref().unwrap_or_default();
            return Some(format!("{code}: {message}"));
        }
        self.messages
            .as_ref()
            .filter(|m| !m.items.is_empty())
            .map(|m| format!("InvalidChangeBatch: {}", m.items.join("; ")))
    }
}

// ==================== Requests ====================

#[derive(Debug, Serialize)]
#[serde(rename = "ChangeResourceRecordSetsRequest")]
pub(crate) struct ChangeResourceRecordSetsRequest<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "ChangeBatch")]
    change_batch: ChangeBatch<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeBatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    changes: Changes<'a>,
}

#[derive(Debug, Serialize)]
struct Changes<'a> {
    #[serde(rename = "Change")]
    items: Vec<ChangeXml<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ChangeXml<'a> {
    action: &'static str,
    resource_record_set: RecordSetOut<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RecordSetOut<'a> {
    name: &'a str,
    #[serde(rename = "Type")]
    record_type: &'a str,
    #[serde(rename = "TTL")]
    ttl: u32,
    resource_records: RecordValuesOut<'a>,
}

#[derive(Debug, Serialize)]
struct RecordValuesOut<'a> {
    #[serde(rename = "ResourceRecord")]
    items: Vec<ValueOut<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ValueOut<'a> {
    value: &'a str,
}

impl<'a> ChangeResourceRecordSetsRequest<'a> {
    pub fn new(changes: &'a ChangeSet, comment: Option<&'a str>) -> Self {
        let items = changes
            .iter()
            .map(|change| ChangeXml {
                action: change.action.as_str(),
                resource_record_set: RecordSetOut {
                    name: change.record.name.as_str(),
                    record_type: change.record.record_type.as_str(),
                    ttl: change.record.ttl,
                    resource_records: RecordValuesOut {
                        items: change
                            .record
                            .values
                            .iter()
                            .map(|value| ValueOut {
                                value: value.as_str(),
                            })
                            .collect(),
                    },
                },
            })
            .collect();

        Self {
            xmlns: XMLNS,
            change_batch: ChangeBatch {
                comment,
                changes: Changes { items },
            },
        }
    }

    pub fn to_xml(&self) -> anyhow::Result<String> {
        let body = quick_xml::se::to_string(self)?;
        Ok(format!(r#"<?xml version="1.0" encoding="UTF-8"?>{body}"#))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sets_are_not_plain_records() {
        let body = r#"<ResourceRecordSet>
  <Name>host.example.com.</Name>
  <Type>A</Type>
  <SetIdentifier>blue</SetIdentifier>
  <Weight>10</Weight>
  <TTL>60</TTL>
  <ResourceRecords><ResourceRecord><Value>10.0.0.1</Value></ResourceRecord></ResourceRecords>
</ResourceRecordSet>"#;
        let set: ResourceRecordSetXml = quick_xml::de::from_str(body).unwrap();
        assert_eq!(set.set_identifier.as_deref(), Some("blue"));
        assert!(set.into_record().is_none());
    }

    #[test]
    fn empty_zone_list() {
        let body = r#"<ListHostedZonesResponse><HostedZones/><IsTruncated>false</IsTruncated><MaxItems>100</MaxItems></ListHostedZonesResponse>"#;
        let page: ListHostedZonesResponse = quick_xml::de::from_str(body).unwrap();
        assert!(page.hosted_zones.items.is_empty());
        assert!(!page.is_truncated);
        assert!(page.next_marker.is_none());
    }

    #[test]
    fn truncated_record_set_page() {
        let body = r#"<ListResourceRecordSetsResponse>
  <ResourceRecordSets>
    <ResourceRecordSet>
      <Name>host.example.com.</Name>
      <Type>A</Type>
      <TTL>60</TTL>
      <ResourceRecords><ResourceRecord><Value>10.0.0.1</Value></ResourceRecord></ResourceRecords>
    </ResourceRecordSet>
  </ResourceRecordSets>
  <IsTruncated>true</IsTruncated>
  <NextRecordName>host.example.com.</NextRecordName>
  <NextRecordType>TXT</NextRecordType>
  <MaxItems>1</MaxItems>
</ListResourceRecordSetsResponse>"#;
        let page: ListResourceRecordSetsResponse = quick_xml::de::from_str(body).unwrap();
        assert!(page.is_truncated);
        assert_eq!(page.next_record_name.as_deref(), Some("host.example.com."));
        assert_eq!(page.resource_record_sets.items.len(), 1);
    }

    #[test]
    fn change_request_serializes_every_change() {
        let mut changes = ChangeSet::new();
        changes.delete(ResourceRecord::single(
            "host.example.com.",
            RecordType::Other("TXT".to_string()),
            300,
            "\"old\"",
        ));
        changes.create(ResourceRecord::single(
            "host.example.com.",
            RecordType::Cname,
            60,
            "unreg.example.com.",
        ));

        let body = ChangeResourceRecordSetsRequest::new(&changes, None)
            .to_xml()
            .unwrap();

        assert!(body.contains("<ChangeResourceRecordSetsRequest xmlns="));
        assert!(!body.contains("<Comment>"));
        assert_eq!(body.matches("<Change>").count(), 2);
        assert!(body.contains("<Type>TXT</Type>"));
        assert!(body.contains("<Type>CNAME</Type>"));
        assert!(body.contains("<Value>unreg.example.com.</Value>"));
    }
}
