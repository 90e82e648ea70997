// Certificate Parser - turn raw peer certificate records into structured,
// immutable certificate information

use crate::error::ScanError;
use crate::tls::peer::{DistinguishedName, RawPeerCertificate};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Subject distinguished-name components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectName {
    #[serde(rename = "CN", skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(rename = "O", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(rename = "OU", skip_serializing_if = "Option::is_none")]
    pub organizational_unit: Option<String>,
    #[serde(rename = "C", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Issuer distinguished-name components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerName {
    #[serde(rename = "CN", skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(rename = "O", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(rename = "C", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Certificate information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    pub subject: SubjectName,
    pub issuer: IssuerName,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    /// SHA-256 fingerprint (colon-separated hex); empty when the peer gave none
    pub fingerprint256: String,
    pub serial_number: String,
    /// Hostname / IP identities, in presentation order
    pub subject_alt_names: Vec<String>,
}

impl CertificateInfo {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_to < now
    }

    pub fn is_not_yet_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_from > now
    }

    /// Whole days until expiry, rounded up; zero or negative once expired
    pub fn days_left_at(&self, now: DateTime<Utc>) -> i64 {
        days_until(self.valid_to, now)
    }

    pub fn days_left(&self) -> i64 {
        self.days_left_at(Utc::now())
    }
}

/// Ceiling of the day distance from `now` to `instant`
pub fn days_until(instant: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = instant.signed_duration_since(now).num_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    if millis > 0 && millis % MILLIS_PER_DAY != 0 {
        days + 1
    } else {
        days
    }
}

/// Parse a raw peer certificate.
///
/// Validity dates are the only required fields; a record without them cannot
/// be evaluated and is reported as malformed.
pub fn parse_certificate(raw: &RawPeerCertificate) -> Result<CertificateInfo, ScanError> {
    let valid_from = required_time(raw.valid_from.as_deref(), "valid_from")?;
    let valid_to = required_time(raw.valid_to.as_deref(), "valid_to")?;

    let subject = raw.subject.as_ref();
    let issuer = raw.issuer.as_ref();

    Ok(CertificateInfo {
        subject: SubjectName {
            common_name: component(subject, "CN"),
            organization: component(subject, "O"),
            organizational_unit: component(subject, "OU"),
            country: component(subject, "C"),
        },
        issuer: IssuerName {
            common_name: component(issuer, "CN"),
            organization: component(issuer, "O"),
            country: component(issuer, "C"),
        },
        valid_from,
        valid_to,
        fingerprint256: raw.fingerprint256.clone().unwrap_or_default(),
        serial_number: raw.serial_number.clone().unwrap_or_default(),
        subject_alt_names: raw
            .subjectaltname
            .as_deref()
            .map(parse_subject_alt_names)
            .unwrap_or_default(),
    })
}

fn component(name: Option<&DistinguishedName>, key: &str) -> Option<String> {
    name.and_then(|dn| dn.get(key))
        .filter(|value| !value.is_empty())
        .cloned()
}

fn required_time(value: Option<&str>, field: &str) -> Result<DateTime<Utc>, ScanError> {
    let value = value.ok_or_else(|| ScanError::malformed(format!("missing {}", field)))?;
    parse_certificate_time(value)
        .ok_or_else(|| ScanError::malformed(format!("unparseable {}: {}", field, value)))
}

/// Split a SAN string ("DNS:a.com, IP Address:10.0.0.1, email:x@y") into
/// identities.
///
/// `DNS:` prefixes are stripped and `IP Address:` entries are reduced to the
/// bare address so both can match a scanned host. Other types keep their
/// prefix and therefore never match a host.
pub fn parse_subject_alt_names(raw: &str) -> Vec<String> {
    raw.split(", ")
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            if let Some(dns) = entry.strip_prefix("DNS:") {
                dns.to_string()
            } else if let Some(ip) = entry.strip_prefix("IP Address:") {
                ip.to_string()
            } else {
                entry.to_string()
            }
        })
        .collect()
}

/// Parse a certificate timestamp.
///
/// Accepts OpenSSL's text form ("Jan  1 00:00:00 2030 GMT"), RFC 3339 and
/// "2030-01-01 00:00:00 UTC".
pub fn parse_certificate_time(value: &str) -> Option<DateTime<Utc>> {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%b %d %H:%M:%S %Y GMT") {
        return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    let cleaned = normalized.trim_end_matches(" UTC").trim_end_matches(" GMT");
    NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
}
