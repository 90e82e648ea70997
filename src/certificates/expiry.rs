// Expiry check - days-left classification against a warning window

use super::parser::CertificateInfo;
use crate::constants::EXPIRING_CRITICAL_DAYS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirySeverity {
    Ok,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ExpirySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpirySeverity::Ok => "ok",
            ExpirySeverity::Medium => "medium",
            ExpirySeverity::High => "high",
            ExpirySeverity::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpiryStatus::Valid => "valid",
            ExpiryStatus::ExpiringSoon => "expiring_soon",
            ExpiryStatus::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}

/// Result of an expiry check on a host's leaf certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryCheckResult {
    pub host: String,
    pub expires_at: DateTime<Utc>,
    pub days_left: i64,
    pub severity: ExpirySeverity,
    pub status: ExpiryStatus,
    pub subject_cn: Option<String>,
    pub issuer_cn: Option<String>,
    pub fingerprint: String,
}

impl ExpiryCheckResult {
    /// Classify days left against a warning window of `warn_days`
    pub fn classify(days_left: i64, warn_days: u32) -> (ExpirySeverity, ExpiryStatus) {
        let warn = i64::from(warn_days);

        if days_left <= 0 {
            (ExpirySeverity::Critical, ExpiryStatus::Expired)
        } else if days_left <= EXPIRING_CRITICAL_DAYS {
            (ExpirySeverity::Critical, ExpiryStatus::ExpiringSoon)
        } else if days_left <= warn {
            (ExpirySeverity::High, ExpiryStatus::ExpiringSoon)
        } else if days_left <= warn * 2 {
            (ExpirySeverity::Medium, ExpiryStatus::Valid)
        } else {
            (ExpirySeverity::Ok, ExpiryStatus::Valid)
        }
    }

    pub fn from_certificate(
        host: &str,
        certificate: &CertificateInfo,
        warn_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let days_left = certificate.days_left_at(now);
        let (severity, status) = Self::classify(days_left, warn_days);

        Self {
            host: host.to_string(),
            expires_at: certificate.valid_to,
            days_left,
            severity,
            status,
            subject_cn: certificate.subject.common_name.clone(),
            issuer_cn: certificate.issuer.common_name.clone(),
            fingerprint: certificate.fingerprint256.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificates::parser::{IssuerName, SubjectName};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_classify_thresholds() {
        use ExpirySeverity::*;
        use ExpiryStatus::*;

        assert_eq!(ExpiryCheckResult::classify(-3, 30), (Critical, Expired));
        assert_eq!(ExpiryCheckResult::classify(0, 30), (Critical, Expired));
        assert_eq!(ExpiryCheckResult::classify(1, 30), (Critical, ExpiringSoon));
        assert_eq!(ExpiryCheckResult::classify(7, 30), (Critical, ExpiringSoon));
        assert_eq!(ExpiryCheckResult::classify(8, 30), (High, ExpiringSoon));
        assert_eq!(ExpiryCheckResult::classify(30, 30), (High, ExpiringSoon));
        assert_eq!(ExpiryCheckResult::classify(31, 30), (Medium, Valid));
        assert_eq!(ExpiryCheckResult::classify(60, 30), (Medium, Valid));
        assert_eq!(ExpiryCheckResult::classify(61, 30), (Ok, Valid));
    }

    #[test]
    fn test_classify_small_window() {
        // a window shorter than the critical band never yields High
        assert_eq!(
            ExpiryCheckResult::classify(5, 3),
            (ExpirySeverity::Critical, ExpiryStatus::ExpiringSoon)
        );
        assert_eq!(
            ExpiryCheckResult::classify(9, 5),
            (ExpirySeverity::Medium, ExpiryStatus::Valid)
        );
    }

    #[test]
    fn test_from_certificate() {
        let now = Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap();
        let cert = CertificateInfo {
            subject: SubjectName {
                common_name: Some("shop.example.com".to_string()),
                ..Default::default()
            },
            issuer: IssuerName {
                common_name: Some("Example CA".to_string()),
                ..Default::default()
            },
            valid_from: now - Duration::days(60),
            valid_to: now + Duration::days(12),
            fingerprint256: "AA:BB".to_string(),
            serial_number: "01".to_string(),
            subject_alt_names: vec!["shop.example.com".to_string()],
        };

        let result = ExpiryCheckResult::from_certificate("shop.example.com", &cert, 30, now);
        assert_eq!(result.days_left, 12);
        assert_eq!(result.severity, ExpirySeverity::High);
        assert_eq!(result.status, ExpiryStatus::ExpiringSoon);
        assert_eq!(result.subject_cn.as_deref(), Some("shop.example.com"));
        assert_eq!(result.issuer_cn.as_deref(), Some("Example CA"));
        assert_eq!(result.fingerprint, "AA:BB");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "expiring_soon");
        assert_eq!(json["severity"], "high");
    }
}
