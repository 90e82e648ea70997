// Anomaly module - Typed findings, scoring and status classification

pub mod engine;
pub mod rules;

pub use engine::{AnomalyEngine, Evaluation};
pub use rules::{AnomalyRule, RuleContext, default_rules, host_matches};

use crate::constants::{INITIAL_SCORE, SAFE_SCORE_THRESHOLD, SUSPICIOUS_SCORE_THRESHOLD};
use crate::rating::HealthGrade;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal risk level of a single finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Low => "blue",
            Severity::Medium => "yellow",
            Severity::High | Severity::Critical => "red",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    CertificateExpired,
    CertificateExpiring,
    CertificateNotYetValid,
    SelfSigned,
    WeakTlsVersion,
    HostnameMismatch,
    ScanFailed,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::CertificateExpired => "certificate_expired",
            AnomalyType::CertificateExpiring => "certificate_expiring",
            AnomalyType::CertificateNotYetValid => "certificate_not_yet_valid",
            AnomalyType::SelfSigned => "self_signed",
            AnomalyType::WeakTlsVersion => "weak_tls_version",
            AnomalyType::HostnameMismatch => "hostname_mismatch",
            AnomalyType::ScanFailed => "scan_failed",
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: AnomalyType,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

impl Anomaly {
    pub fn new(
        kind: AnomalyType,
        severity: Severity,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Synthetic finding for a host that could not be scanned
    pub fn scan_failed() -> Self {
        Self::new(
            AnomalyType::ScanFailed,
            Severity::Critical,
            "TLS connection could not be established",
            "Check that the server is reachable and serving TLS on this port",
        )
    }

    /// Score penalty carried by this finding
    pub fn penalty(&self) -> u32 {
        match (self.kind, self.severity) {
            (AnomalyType::CertificateExpired, _) => 50,
            (AnomalyType::CertificateExpiring, Severity::High | Severity::Critical) => 30,
            (AnomalyType::CertificateExpiring, _) => 15,
            (AnomalyType::CertificateNotYetValid, _) => 40,
            (AnomalyType::SelfSigned, _) => 20,
            (AnomalyType::WeakTlsVersion, _) => 30,
            (AnomalyType::HostnameMismatch, _) => 35,
            (AnomalyType::ScanFailed, _) => 100,
        }
    }
}

/// Sum the penalties and subtract from the starting score, clamped to 0..=100
pub fn score_from_anomalies(anomalies: &[Anomaly]) -> u8 {
    let penalty: i64 = anomalies.iter().map(|a| i64::from(a.penalty())).sum();
    let score = (i64::from(INITIAL_SCORE) - penalty).clamp(0, 100);
    u8::try_from(score).unwrap_or(0)
}

/// Coarse risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Safe,
    Suspicious,
    Dangerous,
}

impl Status {
    pub fn from_score(score: u8) -> Self {
        if score >= SAFE_SCORE_THRESHOLD {
            Status::Safe
        } else if score >= SUSPICIOUS_SCORE_THRESHOLD {
            Status::Suspicious
        } else {
            Status::Dangerous
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Safe => "safe",
            Status::Suspicious => "suspicious",
            Status::Dangerous => "dangerous",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Status::Safe => "green",
            Status::Suspicious => "yellow",
            Status::Dangerous => "red",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one anomaly evaluation.
///
/// Score and status are computed from the anomaly list at construction and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyCheckResult {
    host: String,
    anomalies: Vec<Anomaly>,
    score: u8,
    status: Status,
}

impl AnomalyCheckResult {
    pub fn from_anomalies(host: impl Into<String>, anomalies: Vec<Anomaly>) -> Self {
        let score = score_from_anomalies(&anomalies);
        Self {
            host: host.into(),
            anomalies,
            score,
            status: Status::from_score(score),
        }
    }

    /// Result for a host whose scan failed: one critical `scan_failed`, score 0
    pub fn scan_failed(host: impl Into<String>) -> Self {
        Self::from_anomalies(host, vec![Anomaly::scan_failed()])
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn grade(&self) -> HealthGrade {
        HealthGrade::from_score(self.score)
    }

    pub fn has(&self, kind: AnomalyType) -> bool {
        self.anomalies.iter().any(|a| a.kind == kind)
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.anomalies.iter().map(|a| a.severity).max()
    }
}
