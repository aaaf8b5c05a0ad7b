use std::time::Duration;

use super::{
    client::DnsApiClient,
    models::*,
    sign::{canonical_query, Signer},
    xml::*,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::{Method, StatusCode, Url};

pub const DEFAULT_ENDPOINT: &str = "https://route53.amazonaws.com";
const API_VERSION: &str = "2013-04-01";
// Route 53 is a global service signed against us-east-1.
const SIGNING_REGION: &str = "us-east-1";
const SERVICE: &str = "route53";

pub struct Route53Client {
    client: reqwest::Client,
    endpoint: String,
    host: String,
    signer: Signer,
    comment: String,
}

#[async_trait]
impl DnsApiClient for Route53Client {
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let path = format!("/{API_VERSION}/hostedzone");
        let mut zones = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let query = match &marker {
                Some(marker) => canonical_query(&[("marker", marker.as_str())]),
                None => String::new(),
            };
            let text = self
                .send(Method::GET, &path, &query, None)
                .await
                .context("Failed to list hosted zones")?;
            let page: ListHostedZonesResponse = quick_xml::de::from_str(&text)
                .with_context(|| format!("Failed to parse hosted zone list: {}", text))?;

            zones.extend(page.hosted_zones.items.into_iter().map(HostedZone::from));

            match page.next_marker {
                Some(next) if page.is_truncated && !next.is_empty() => marker = Some(next),
                _ => break,
            }
        }

        debug!("Found {} hosted zones", zones.len());
        Ok(zones)
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        start_name: &str,
    ) -> Result<Vec<ResourceRecord>> {
        let path = format!("/{API_VERSION}/hostedzone/{zone_id}/rrset");
        let query = canonical_query(&[("name", start_name)]);
        let text = self
            .send(Method::GET, &path, &query, None)
            .await
            .with_context(|| format!("Failed to list record sets in zone {}", zone_id))?;
        let page: ListResourceRecordSetsResponse = quick_xml::de::from_str(&text)
            .with_context(|| format!("Failed to parse record set list: {}", text))?;

        // A single page is read. When the next page still starts at this
        // name, the sets seen here are not all the sets it has.
        if page.is_truncated
            && page
                .next_record_name
                .as_deref()
                .is_some_and(|next| next.eq_ignore_ascii_case(start_name))
        {
            warn!(
                "Record sets at {start_name} span more than one page, reconciling the first page only"
            );
        }

        let mut records = Vec::with_capacity(page.resource_record_sets.items.len());
        for set in page.resource_record_sets.items {
            let (name, record_type) = (set.name.clone(), set.record_type.clone());
            match set.into_record() {
                Some(record) => records.push(record),
                None if name == start_name => {
                    warn!("Leaving alias or routing-policy record {name} {record_type} untouched")
                }
                None => {}
            }
        }
        Ok(records)
    }

    async fn submit_change_batch(&self, zone_id: &str, changes: &ChangeSet) -> Result<ChangeInfo> {
        let path = format!("/{API_VERSION}/hostedzone/{zone_id}/rrset/");
        let body = ChangeResourceRecordSetsRequest::new(changes, Some(self.comment.as_str()))
            .to_xml()
            .context("Failed to serialize change batch")?;
        debug!("Request Body: {body}");

        let text = self
            .send(Method::POST, &path, "", Some(body))
            .await
            .with_context(|| format!("Failed to submit change batch to zone {}", zone_id))?;
        let response: ChangeResourceRecordSetsResponse = quick_xml::de::from_str(&text)
            .with_context(|| format!("Failed to parse change response: {}", text))?;

        Ok(ChangeInfo {
            id: response.change_info.id,
            status: response.change_info.status,
        })
    }
}

impl Route53Client {
    pub fn new(
        access_key_id: &str,
        secret_access_key: &str,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let url = Url::parse(&endpoint)
            .with_context(|| format!("Invalid Route 53 endpoint: {}", endpoint))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(anyhow!("Route 53 endpoint has no host: {}", endpoint)),
        };

        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            endpoint,
            host,
            signer: Signer::new(access_key_id, secret_access_key, SIGNING_REGION, SERVICE),
            comment: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        })
    }

    fn build_headers(&self, timestamp: &str, has_body: bool) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Host".to_string(), self.host.clone()),
            ("X-Amz-Date".to_string(), timestamp.to_string()),
        ];
        if has_body {
            headers.push(("Content-Type".to_string(), "application/xml".to_string()));
        }
        headers
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &str,
        body: Option<String>,
    ) -> Result<String> {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let headers = self.build_headers(&timestamp, body.is_some());
        let payload = body.unwrap_or_default();
        let authorization = self.signer.sign(
            method.as_str(),
            path,
            query,
            &headers,
            payload.as_bytes(),
            &timestamp,
        );

        let url = if query.is_empty() {
            format!("{}{}", self.endpoint, path)
        } else {
            format!("{}{}?{}", self.endpoint, path, query)
        };
        debug!("{} {}", method, url);

        // reqwest derives Host from the URL itself.
        let mut request = self
            .client
            .request(method, &url)
            .header("Authorization", authorization);
        for (name, value) in headers.iter().filter(|(name, _)| name != "Host") {
            request = request.header(name, value);
        }
        if !payload.is_empty() {
            request = request.body(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(anyhow!(describe_error(status, &text)));
        }
        Ok(text)
    }
}

fn describe_error(status: StatusCode, body: &str) -> String {
    let detail = quick_xml::de::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.describe())
        .unwrap_or_else(|| body.to_string());
    format!("HTTP {}: {}", status.as_u16(), detail)
}
