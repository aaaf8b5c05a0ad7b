//! AWS Signature Version 4
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>

use std::fmt::Write;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

type HmacSha256 = Hmac<Sha256>;

pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub(crate) fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub(crate) fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Percent-encodes and sorts query parameters. The result is used both in the
/// request URL and in the canonical request, so the two always agree.
pub(crate) fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    pairs.sort_unstable();
    pairs.join("&")
}

#[derive(Debug, Clone)]
pub(crate) struct Signer {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    service: String,
}

impl Signer {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Builds the `Authorization` header value. `timestamp` is the
    /// `X-Amz-Date` value (`%Y%m%dT%H%M%SZ`) and must also be among `headers`.
    pub fn sign(
        &self,
        method: &str,
        uri: &str,
        query: &str,
        headers: &[(String, String)],
        payload: &[u8],
        timestamp: &str,
    ) -> String {
        let mut sorted_headers: Vec<_> = headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim()))
            .collect();
        sorted_headers.sort_by(|a, b| a.0.cmp(&b.0));

        let canonical_headers = sorted_headers
            .iter()
            .fold(String::new(), |mut acc, (k, v)| {
                let _ = writeln!(acc, "{k}:{v}");
                acc
            });
        let signed_headers = sorted_headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "{method}\n{uri}\n{query}\n{canonical_headers}\n{signed_headers}\n{}",
            hex_sha256(payload)
        );
        log::debug!("CanonicalRequest:\n{canonical_request}");

        let date = timestamp.get(..8).unwrap_or(timestamp);
        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{timestamp}\n{scope}\n{}",
            hex_sha256(canonical_request.as_bytes())
        );

        let key = signing_key(&self.secret_access_key, date, &self.region, &self.service);
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn vanilla_headers() -> Vec<(String, String)> {
        vec![
            ("Host".to_string(), "example.amazonaws.com".to_string()),
            ("X-Amz-Date".to_string(), "20150830T123600Z".to_string()),
        ]
    }

    #[test]
    fn derives_documented_signing_key() {
        let key = signing_key(SECRET, "20120215", "us-east-1", "iam");
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn signs_get_vanilla_vector() {
        let signer = Signer::new("AKIDEXAMPLE", SECRET, "us-east-1", "service");
        let auth = signer.sign("GET", "/", "", &vanilla_headers(), b"", "20150830T123600Z");
        assert_eq!(
            auth,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn header_order_does_not_matter() {
        let signer = Signer::new("AKIDEXAMPLE", SECRET, "us-east-1", "route53");
        let mut reversed = vanilla_headers();
        reversed.reverse();

        let a = signer.sign("GET", "/", "", &vanilla_headers(), b"", "20150830T123600Z");
        let b = signer.sign("GET", "/", "", &reversed, b"", "20150830T123600Z");
        assert_eq!(a, b);
    }

    #[test]
    fn payload_changes_signature() {
        let signer = Signer::new("AKIDEXAMPLE", SECRET, "us-east-1", "route53");
        let a = signer.sign("POST", "/", "", &vanilla_headers(), b"<a/>", "20150830T123600Z");
        let b = signer.sign("POST", "/", "", &vanilla_headers(), b"<b/>", "20150830T123600Z");
        assert_ne!(a, b);
    }

    #[test]
    fn canonical_query_sorts_and_encodes() {
        assert_eq!(
            canonical_query(&[("name", "host.example.com."), ("maxitems", "10")]),
            "maxitems=10&name=host.example.com."
        );
        assert_eq!(canonical_query(&[("marker", "a b/c")]), "marker=a%20b%2Fc");
        assert_eq!(canonical_query(&[]), "");
    }
}
