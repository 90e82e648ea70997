// Anomaly rules - independent checks over one parsed certificate and the
// negotiated connection parameters

use super::{Anomaly, AnomalyType, Severity};
use crate::certificates::parser::CertificateInfo;
use crate::constants::{EXPIRING_CRITICAL_DAYS, EXPIRING_WARNING_DAYS, WEAK_TLS_VERSIONS};
use chrono::{DateTime, Utc};

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Host as the caller asked for it
    pub host: &'a str,
    pub certificate: &'a CertificateInfo,
    pub tls_version: Option<&'a str>,
    pub now: DateTime<Utc>,
}

/// Trait for anomaly rules
pub trait AnomalyRule: Send + Sync {
    /// The anomaly type this rule can produce
    fn kind(&self) -> AnomalyType;

    /// Evaluate the rule; `None` when the certificate passes
    fn check(&self, ctx: &RuleContext<'_>) -> Option<Anomaly>;
}

/// The built-in rule battery, in evaluation order
pub fn default_rules() -> Vec<Box<dyn AnomalyRule>> {
    vec![
        Box::new(ExpiredRule),
        Box::new(ExpiringRule),
        Box::new(NotYetValidRule),
        Box::new(SelfSignedRule),
        Box::new(WeakTlsVersionRule),
        Box::new(HostnameMismatchRule),
    ]
}

pub struct ExpiredRule;

impl AnomalyRule for ExpiredRule {
    fn kind(&self) -> AnomalyType {
        AnomalyType::CertificateExpired
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<Anomaly> {
        if !ctx.certificate.is_expired_at(ctx.now) {
            return None;
        }

        Some(Anomaly::new(
            self.kind(),
            Severity::Critical,
            format!(
                "Certificate expired on {}",
                ctx.certificate.valid_to.format("%Y-%m-%d")
            ),
            "Renew the certificate immediately",
        ))
    }
}

pub struct ExpiringRule;

impl AnomalyRule for ExpiringRule {
    fn kind(&self) -> AnomalyType {
        AnomalyType::CertificateExpiring
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<Anomaly> {
        if ctx.certificate.is_expired_at(ctx.now) {
            return None;
        }

        let days_left = ctx.certificate.days_left_at(ctx.now);
        if days_left > EXPIRING_WARNING_DAYS {
            return None;
        }

        let severity = if days_left <= EXPIRING_CRITICAL_DAYS {
            Severity::High
        } else {
            Severity::Medium
        };

        Some(Anomaly::new(
            self.kind(),
            severity,
            format!("Certificate expires in {} days", days_left),
            "Renew the certificate soon",
        ))
    }
}

pub struct NotYetValidRule;

impl AnomalyRule for NotYetValidRule {
    fn kind(&self) -> AnomalyType {
        AnomalyType::CertificateNotYetValid
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<Anomaly> {
        if !ctx.certificate.is_not_yet_valid_at(ctx.now) {
            return None;
        }

        Some(Anomaly::new(
            self.kind(),
            Severity::High,
            format!(
                "Certificate is not valid before {}",
                ctx.certificate.valid_from.format("%Y-%m-%d")
            ),
            "Check the server clock or replace the certificate",
        ))
    }
}

/// Flags certificates whose issuer CN equals their subject CN. Both CNs must
/// be present: two absent CNs say nothing about who signed the certificate.
pub struct SelfSignedRule;

impl AnomalyRule for SelfSignedRule {
    fn kind(&self) -> AnomalyType {
        AnomalyType::SelfSigned
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<Anomaly> {
        let subject = ctx.certificate.subject.common_name.as_deref()?;
        let issuer = ctx.certificate.issuer.common_name.as_deref()?;

        if subject != issuer {
            return None;
        }

        Some(Anomaly::new(
            self.kind(),
            Severity::Medium,
            "Self-signed certificate detected",
            "Use a certificate issued by a trusted CA in production",
        ))
    }
}

pub struct WeakTlsVersionRule;

impl AnomalyRule for WeakTlsVersionRule {
    fn kind(&self) -> AnomalyType {
        AnomalyType::WeakTlsVersion
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<Anomaly> {
        let version = ctx.tls_version?;
        if !WEAK_TLS_VERSIONS.contains(&version) {
            return None;
        }

        Some(Anomaly::new(
            self.kind(),
            Severity::High,
            format!("Outdated TLS version negotiated: {}", version),
            "Require at least TLSv1.2, preferably TLSv1.3",
        ))
    }
}

/// Skipped entirely for certificates without SANs.
pub struct HostnameMismatchRule;

impl AnomalyRule for HostnameMismatchRule {
    fn kind(&self) -> AnomalyType {
        AnomalyType::HostnameMismatch
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Option<Anomaly> {
        let cert = ctx.certificate;
        if cert.subject_alt_names.is_empty() {
            return None;
        }

        if host_matches(
            ctx.host,
            &cert.subject_alt_names,
            cert.subject.common_name.as_deref(),
        ) {
            return None;
        }

        Some(Anomaly::new(
            self.kind(),
            Severity::High,
            format!("Certificate does not cover hostname {}", ctx.host),
            "Issue a certificate for the correct hostname",
        ))
    }
}

/// Check a host against SAN entries and the subject CN.
///
/// Comparison is ASCII case-insensitive. `*.example.com` matches any host
/// ending in `.example.com` but not `example.com` itself.
pub fn host_matches(host: &str, sans: &[String], common_name: Option<&str>) -> bool {
    let host = host.to_ascii_lowercase();

    if common_name.is_some_and(|cn| cn.eq_ignore_ascii_case(&host)) {
        return true;
    }

    sans.iter().any(|san| {
        let san = san.to_ascii_lowercase();
        if san == host {
            return true;
        }
        match san.strip_prefix('*') {
            Some(suffix) if suffix.starts_with('.') => host.ends_with(suffix),
            _ => false,
        }
    })
}
