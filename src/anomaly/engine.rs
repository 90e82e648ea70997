// Anomaly Engine - run every rule against a certificate and score the findings

use super::rules::{AnomalyRule, RuleContext, default_rules};
use super::{Anomaly, AnomalyCheckResult};
use crate::certificates::parser::CertificateInfo;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Findings of one pass plus the total penalty they carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub anomalies: Vec<Anomaly>,
    pub penalty: u32,
}

/// Ordered battery of anomaly rules.
///
/// Every rule runs on every evaluation; none short-circuits another.
pub struct AnomalyEngine {
    rules: Vec<Box<dyn AnomalyRule>>,
}

impl Default for AnomalyEngine {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl AnomalyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<Box<dyn AnomalyRule>>) -> Self {
        Self { rules }
    }

    /// Append a rule after the existing ones
    pub fn add_rule(mut self, rule: Box<dyn AnomalyRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn evaluate(
        &self,
        host: &str,
        certificate: &CertificateInfo,
        tls_version: Option<&str>,
    ) -> Evaluation {
        self.evaluate_at(host, certificate, tls_version, Utc::now())
    }

    pub fn evaluate_at(
        &self,
        host: &str,
        certificate: &CertificateInfo,
        tls_version: Option<&str>,
        now: DateTime<Utc>,
    ) -> Evaluation {
        let ctx = RuleContext {
            host,
            certificate,
            tls_version,
            now,
        };

        let anomalies: Vec<Anomaly> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let finding = rule.check(&ctx);
                if let Some(ref anomaly) = finding {
                    debug!("{}: {} ({})", host, anomaly.kind, anomaly.severity);
                }
                finding
            })
            .collect();

        let penalty = anomalies.iter().map(Anomaly::penalty).sum();

        Evaluation { anomalies, penalty }
    }

    /// Evaluate and classify in one step
    pub fn assess(
        &self,
        host: &str,
        certificate: &CertificateInfo,
        tls_version: Option<&str>,
    ) -> AnomalyCheckResult {
        self.assess_at(host, certificate, tls_version, Utc::now())
    }

    pub fn assess_at(
        &self,
        host: &str,
        certificate: &CertificateInfo,
        tls_version: Option<&str>,
        now: DateTime<Utc>,
    ) -> AnomalyCheckResult {
        let evaluation = self.evaluate_at(host, certificate, tls_version, now);
        AnomalyCheckResult::from_anomalies(host, evaluation.anomalies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::{AnomalyType, Severity, Status};
    use crate::certificates::parser::{IssuerName, SubjectName};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn certificate(cn: &str, issuer_cn: &str, valid_to: DateTime<Utc>, sans: &[&str]) -> CertificateInfo {
        CertificateInfo {
            subject: SubjectName {
                common_name: Some(cn.to_string()),
                ..Default::default()
            },
            issuer: IssuerName {
                common_name: Some(issuer_cn.to_string()),
                ..Default::default()
            },
            valid_from: now() - Duration::days(90),
            valid_to,
            fingerprint256: String::new(),
            serial_number: String::new(),
            subject_alt_names: sans.iter().map(|s| s.to_string()).collect(),
        }
    }

    struct AlwaysFlag;

    impl AnomalyRule for AlwaysFlag {
        fn kind(&self) -> AnomalyType {
            AnomalyType::WeakTlsVersion
        }

        fn check(&self, _ctx: &RuleContext<'_>) -> Option<Anomaly> {
            Some(Anomaly::new(self.kind(), Severity::High, "flag", "fix"))
        }
    }

    #[test]
    fn test_clean_certificate_scores_100() {
        let cert = certificate(
            "www.example.com",
            "Example CA",
            now() + Duration::days(200),
            &["www.example.com"],
        );
        let result = AnomalyEngine::new().assess_at("www.example.com", &cert, Some("TLSv1.3"), now());

        assert!(result.anomalies().is_empty());
        assert_eq!(result.score(), 100);
        assert_eq!(result.status(), Status::Safe);
    }

    #[test]
    fn test_expiring_in_five_days() {
        let cert = certificate(
            "www.example.com",
            "Example CA",
            now() + Duration::days(5),
            &["www.example.com"],
        );
        let engine = AnomalyEngine::new();

        let evaluation = engine.evaluate_at("www.example.com", &cert, Some("TLSv1.3"), now());
        assert_eq!(evaluation.anomalies.len(), 1);
        assert_eq!(evaluation.anomalies[0].kind, AnomalyType::CertificateExpiring);
        assert_eq!(evaluation.anomalies[0].severity, Severity::High);
        assert_eq!(evaluation.penalty, 30);

        let result = engine.assess_at("www.example.com", &cert, Some("TLSv1.3"), now());
        assert_eq!(result.score(), 70);
        assert_eq!(result.status(), Status::Suspicious);
    }

    #[test]
    fn test_expired_and_self_signed() {
        let cert = certificate(
            "legacy.example.com",
            "legacy.example.com",
            now() - Duration::days(10),
            &["legacy.example.com"],
        );
        let result =
            AnomalyEngine::new().assess_at("legacy.example.com", &cert, Some("TLSv1.2"), now());

        let kinds: Vec<AnomalyType> = result.anomalies().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AnomalyType::CertificateExpired, AnomalyType::SelfSigned]);
        assert_eq!(result.anomalies()[0].severity, Severity::Critical);
        assert_eq!(result.score(), 30);
        assert_eq!(result.status(), Status::Dangerous);
    }

    #[test]
    fn test_wildcard_san() {
        let cert = certificate(
            "*.example.com",
            "Example CA",
            now() + Duration::days(200),
            &["*.example.com"],
        );
        let engine = AnomalyEngine::new();

        let ok = engine.assess_at("api.example.com", &cert, Some("TLSv1.3"), now());
        assert!(!ok.has(AnomalyType::HostnameMismatch));

        for host in ["example.com", "evil.com"] {
            let result = engine.assess_at(host, &cert, Some("TLSv1.3"), now());
            assert!(result.has(AnomalyType::HostnameMismatch), "{} should mismatch", host);
            assert_eq!(result.score(), 65);
        }
    }

    #[test]
    fn test_empty_san_list_skips_mismatch() {
        let cert = certificate("legacy", "Example CA", now() + Duration::days(200), &[]);
        let result = AnomalyEngine::new().assess_at("evil.com", &cert, Some("TLSv1.3"), now());
        assert!(result.anomalies().is_empty());
    }

    #[test]
    fn test_rules_accumulate() {
        let cert = certificate("self", "self", now() - Duration::days(1), &["other.example.com"]);
        let result = AnomalyEngine::new().assess_at("evil.com", &cert, Some("TLSv1"), now());

        assert!(result.has(AnomalyType::CertificateExpired));
        assert!(result.has(AnomalyType::SelfSigned));
        assert!(result.has(AnomalyType::WeakTlsVersion));
        assert!(result.has(AnomalyType::HostnameMismatch));
        assert_eq!(result.score(), 0);
        assert_eq!(result.status(), Status::Dangerous);
    }

    #[test]
    fn test_score_always_in_bounds() {
        let engine = AnomalyEngine::new();
        for days in [-400i64, -1, 0, 1, 7, 8, 30, 31, 400] {
            for tls in [None, Some("SSLv3"), Some("TLSv1.3")] {
                for issuer in ["Example CA", "www.example.com"] {
                    let cert = certificate(
                        "www.example.com",
                        issuer,
                        now() + Duration::days(days),
                        &["mail.example.com"],
                    );
                    let result = engine.assess_at("www.example.com", &cert, tls, now());
                    assert!(result.score() <= 100);
                    assert_eq!(result.status(), Status::from_score(result.score()));
                    if days < 0 {
                        assert!(result.score() <= 50);
                        assert!(result.has(AnomalyType::CertificateExpired));
                    }
                }
            }
        }
    }

    #[test]
    fn test_custom_rule() {
        let cert = certificate(
            "www.example.com",
            "Example CA",
            now() + Duration::days(200),
            &["www.example.com"],
        );
        let engine = AnomalyEngine::with_rules(vec![]).add_rule(Box::new(AlwaysFlag));
        assert_eq!(engine.rule_count(), 1);

        let result = engine.assess_at("www.example.com", &cert, None, now());
        assert_eq!(result.score(), 70);
    }
}
