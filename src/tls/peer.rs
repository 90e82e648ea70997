// Peer certificate handle - raw, loosely-shaped certificate records captured at
// the TLS boundary, linked to their issuers by index

use crate::error::ScanError;
use openssl::hash::MessageDigest;
use openssl::x509::{GeneralNameRef, X509NameRef, X509Ref};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;

/// Distinguished-name components keyed by attribute short name ("CN", "O", ...)
pub type DistinguishedName = BTreeMap<String, String>;

/// A peer certificate as captured from the handshake.
///
/// Every field may be absent: the parser treats this record as semi-trusted
/// input and never assumes a field exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPeerCertificate {
    pub subject: Option<DistinguishedName>,
    pub issuer: Option<DistinguishedName>,
    /// Start of validity in OpenSSL text form, e.g. "Jan  1 00:00:00 2030 GMT"
    pub valid_from: Option<String>,
    /// End of validity in OpenSSL text form
    pub valid_to: Option<String>,
    /// SHA-256 over the DER encoding, colon-separated uppercase hex
    pub fingerprint256: Option<String>,
    pub serial_number: Option<String>,
    /// Comma-space separated SAN entries, e.g. "DNS:a.com, IP Address:10.0.0.1"
    pub subjectaltname: Option<String>,
    /// Index of the issuing certificate within the owning handle
    pub issuer_link: Option<usize>,
}

impl RawPeerCertificate {
    /// True when the record carries no certificate data at all
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.issuer.is_none()
            && self.valid_from.is_none()
            && self.valid_to.is_none()
            && self.fingerprint256.is_none()
            && self.serial_number.is_none()
            && self.subjectaltname.is_none()
    }

    /// Capture the fields of an OpenSSL certificate.
    ///
    /// The issuer link is left unset; `PeerCertificateHandle::from_x509_chain`
    /// resolves links once the whole presented chain is known.
    pub fn from_x509(cert: &X509Ref) -> Result<Self, ScanError> {
        let fingerprint256 = cert
            .digest(MessageDigest::sha256())?
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":");

        let serial_number = cert
            .serial_number()
            .to_bn()
            .and_then(|bn| bn.to_hex_str().map(|s| s.to_string()))
            .ok();

        Ok(Self {
            subject: Some(distinguished_name(cert.subject_name())),
            issuer: Some(distinguished_name(cert.issuer_name())),
            valid_from: Some(cert.not_before().to_string()),
            valid_to: Some(cert.not_after().to_string()),
            fingerprint256: Some(fingerprint256),
            serial_number,
            subjectaltname: subject_alt_name_string(cert),
            issuer_link: None,
        })
    }
}

fn distinguished_name(name: &X509NameRef) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    for entry in name.entries() {
        let Ok(key) = entry.object().nid().short_name() else {
            continue;
        };
        let Ok(value) = std::str::from_utf8(entry.data().as_slice()) else {
            continue;
        };
        // first occurrence wins for multi-valued attributes
        dn.entry(key.to_string()).or_insert_with(|| value.to_string());
    }
    dn
}

fn subject_alt_name_string(cert: &X509Ref) -> Option<String> {
    let names = cert.subject_alt_names()?;
    let entries: Vec<String> = names.iter().filter_map(general_name_entry).collect();

    if entries.is_empty() {
        None
    } else {
        Some(entries.join(", "))
    }
}

fn general_name_entry(name: &GeneralNameRef) -> Option<String> {
    if let Some(dns) = name.dnsname() {
        return Some(format!("DNS:{}", dns));
    }
    if let Some(bytes) = name.ipaddress() {
        return ip_from_bytes(bytes).map(|ip| format!("IP Address:{}", ip));
    }
    if let Some(email) = name.email() {
        return Some(format!("email:{}", email));
    }
    if let Some(uri) = name.uri() {
        return Some(format!("URI:{}", uri));
    }
    None
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

/// The certificates a server presented in one handshake, leaf first.
///
/// Issuer links are indexes into this handle, so a walk over them can never
/// reach memory outside the presented chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerCertificateHandle {
    certificates: Vec<RawPeerCertificate>,
}

impl PeerCertificateHandle {
    pub fn new(certificates: Vec<RawPeerCertificate>) -> Self {
        Self { certificates }
    }

    /// Build a handle from the chain OpenSSL exposes, resolving issuer links by
    /// matching each certificate's issuer name against the presented subjects.
    pub fn from_x509_chain<'a, I>(chain: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = &'a X509Ref>,
    {
        let mut certificates = Vec::new();
        let mut subjects = Vec::new();
        let mut issuers = Vec::new();

        for cert in chain {
            certificates.push(RawPeerCertificate::from_x509(cert)?);
            subjects.push(cert.subject_name().to_der()?);
            issuers.push(cert.issuer_name().to_der()?);
        }

        for (idx, issuer) in issuers.iter().enumerate() {
            let link = if subjects[idx] == *issuer {
                Some(idx)
            } else {
                subjects
                    .iter()
                    .enumerate()
                    .find(|(other, subject)| *other != idx && *subject == issuer)
                    .map(|(other, _)| other)
            };
            certificates[idx].issuer_link = link;
        }

        debug!("Captured {} peer certificate(s)", certificates.len());

        Ok(Self { certificates })
    }

    pub fn leaf(&self) -> Option<&RawPeerCertificate> {
        self.certificates.first()
    }

    pub fn get(&self, index: usize) -> Option<&RawPeerCertificate> {
        self.certificates.get(index)
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// True when a leaf is present and carries certificate data
    pub fn has_certificate(&self) -> bool {
        self.leaf().is_some_and(|leaf| !leaf.is_empty())
    }
}
