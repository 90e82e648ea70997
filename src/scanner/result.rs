// Scan results - success/failure outcome of a single host scan

use crate::certificates::{CertificateChain, CertificateInfo};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// What a scan produced. A result is either a certificate or an error,
/// never both and never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Success {
        certificate: CertificateInfo,
        chain: CertificateChain,
        tls_version: Option<String>,
        cipher_suite: Option<String>,
    },
    Failure {
        error: String,
    },
}

/// Result of `scan_host`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub host: String,
    pub port: u16,
    pub timestamp: DateTime<Utc>,
    pub outcome: ScanOutcome,
}

impl ScanResult {
    pub fn success(
        host: impl Into<String>,
        port: u16,
        chain: CertificateChain,
        tls_version: Option<String>,
        cipher_suite: Option<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            timestamp: Utc::now(),
            outcome: ScanOutcome::Success {
                certificate: chain.leaf.clone(),
                chain,
                tls_version,
                cipher_suite,
            },
        }
    }

    pub fn failure(host: impl Into<String>, port: u16, error: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            timestamp: Utc::now(),
            outcome: ScanOutcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ScanOutcome::Success { .. })
    }

    pub fn certificate(&self) -> Option<&CertificateInfo> {
        match &self.outcome {
            ScanOutcome::Success { certificate, .. } => Some(certificate),
            ScanOutcome::Failure { .. } => None,
        }
    }

    pub fn chain(&self) -> Option<&CertificateChain> {
        match &self.outcome {
            ScanOutcome::Success { chain, .. } => Some(chain),
            ScanOutcome::Failure { .. } => None,
        }
    }

    pub fn tls_version(&self) -> Option<&str> {
        match &self.outcome {
            ScanOutcome::Success { tls_version, .. } => tls_version.as_deref(),
            ScanOutcome::Failure { .. } => None,
        }
    }

    pub fn cipher_suite(&self) -> Option<&str> {
        match &self.outcome {
            ScanOutcome::Success { cipher_suite, .. } => cipher_suite.as_deref(),
            ScanOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ScanOutcome::Success { .. } => None,
            ScanOutcome::Failure { error } => Some(error),
        }
    }
}

/// Flat wire shape: `success` flag plus whichever side is populated
#[derive(Serialize)]
struct ScanResultWire<'a> {
    host: &'a str,
    port: u16,
    success: bool,
    timestamp: &'a DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate: Option<&'a CertificateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chain: Option<&'a CertificateChain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tls_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cipher_suite: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ScanResultWire {
            host: &self.host,
            port: self.port,
            success: self.is_success(),
            timestamp: &self.timestamp,
            certificate: self.certificate(),
            chain: self.chain(),
            tls_version: self.tls_version(),
            cipher_suite: self.cipher_suite(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Presented chain of a host, as returned by `fetch_chain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    pub host: String,
    pub chain: CertificateChain,
    pub chain_length: usize,
    pub is_complete: bool,
}

impl ChainSummary {
    pub fn new(host: impl Into<String>, chain: CertificateChain) -> Self {
        Self {
            host: host.into(),
            chain_length: chain.len(),
            is_complete: chain.is_complete(),
            chain,
        }
    }
}
