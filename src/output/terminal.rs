// Terminal output - coloured, human-readable rendering of scan results

use crate::anomaly::{AnomalyCheckResult, Severity, Status};
use crate::certificates::{CertificateInfo, ExpiryCheckResult, ExpirySeverity};
use crate::rating::HealthGrade;
use crate::scanner::{BatchEntry, ChainSummary, ScanResult};
use colored::*;
use std::fmt::Write;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn section_header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.cyan().bold());
    let _ = writeln!(out, "{}", "=".repeat(50));
}

fn colorize(text: &str, color: &str) -> ColoredString {
    match color {
        "green" => text.green(),
        "blue" => text.blue(),
        "yellow" => text.yellow(),
        "red" => text.red(),
        _ => text.normal(),
    }
}

fn format_status(status: Status) -> ColoredString {
    colorize(&status.to_string().to_uppercase(), status.color()).bold()
}

fn format_severity(severity: Severity) -> ColoredString {
    let label = format!("[{}]", severity.as_str().to_uppercase());
    match severity {
        Severity::Critical => label.red().bold(),
        _ => colorize(&label, severity.color()),
    }
}

fn format_grade(grade: HealthGrade) -> ColoredString {
    colorize(&grade.to_string(), grade.color()).bold()
}

fn format_days_left(days_left: i64, severity: ExpirySeverity) -> ColoredString {
    let text = if days_left <= 0 {
        format!("expired {} day(s) ago", -days_left)
    } else {
        format!("{} day(s) left", days_left)
    };
    match severity {
        ExpirySeverity::Ok => text.green(),
        ExpirySeverity::Medium => text.yellow(),
        ExpirySeverity::High | ExpirySeverity::Critical => text.red(),
    }
}

fn write_certificate(out: &mut String, label: &str, cert: &CertificateInfo) {
    let _ = writeln!(out, "  {}", label.bold());
    let _ = writeln!(
        out,
        "    Subject:     {}",
        cert.subject.common_name.as_deref().unwrap_or("-")
    );
    if let Some(org) = &cert.subject.organization {
        let _ = writeln!(out, "    Org:         {}", org);
    }
    let _ = writeln!(
        out,
        "    Issuer:      {}",
        cert.issuer.common_name.as_deref().unwrap_or("-")
    );
    let _ = writeln!(out, "    Valid from:  {}", cert.valid_from.format(DATE_FORMAT));
    let _ = writeln!(out, "    Valid to:    {}", cert.valid_to.format(DATE_FORMAT));
    if !cert.subject_alt_names.is_empty() {
        let _ = writeln!(out, "    SANs:        {}", cert.subject_alt_names.join(", "));
    }
    if !cert.serial_number.is_empty() {
        let _ = writeln!(out, "    Serial:      {}", cert.serial_number);
    }
    if !cert.fingerprint256.is_empty() {
        let _ = writeln!(out, "    SHA-256:     {}", cert.fingerprint256.dimmed());
    }
}

pub fn render_scan(result: &ScanResult) -> String {
    let mut out = String::new();
    section_header(&mut out, &format!("Scan {}:{}", result.host, result.port));

    if let Some(error) = result.error() {
        let _ = writeln!(out, "  {} {}", "X".red().bold(), error.red());
        return out;
    }

    let _ = writeln!(
        out,
        "  TLS version: {}",
        result.tls_version().unwrap_or("unknown")
    );
    let _ = writeln!(
        out,
        "  Cipher:      {}",
        result.cipher_suite().unwrap_or("unknown")
    );

    if let Some(chain) = result.chain() {
        let _ = writeln!(out, "  Chain:       {} certificate(s)", chain.len());
        write_certificate(&mut out, "Leaf", &chain.leaf);
    }

    out
}

pub fn render_anomaly(result: &AnomalyCheckResult) -> String {
    let mut out = String::new();
    section_header(&mut out, &format!("Anomaly check {}", result.host()));

    let _ = writeln!(
        out,
        "  Score: {}/100  Grade: {}  Status: {}",
        result.score(),
        format_grade(result.grade()),
        format_status(result.status())
    );

    if result.anomalies().is_empty() {
        let _ = writeln!(out, "  {} No anomalies found", "Y".green());
        return out;
    }

    for anomaly in result.anomalies() {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            format_severity(anomaly.severity),
            anomaly.kind,
            anomaly.description
        );
        let _ = writeln!(out, "      -> {}", anomaly.recommendation.dimmed());
    }

    out
}

pub fn render_expiry(result: &ExpiryCheckResult) -> String {
    let mut out = String::new();
    section_header(&mut out, &format!("Expiry {}", result.host));

    let _ = writeln!(
        out,
        "  Expires:  {} ({})",
        result.expires_at.format(DATE_FORMAT),
        format_days_left(result.days_left, result.severity)
    );
    let _ = writeln!(out, "  Status:   {} / {}", result.status, result.severity);
    let _ = writeln!(
        out,
        "  Subject:  {}",
        result.subject_cn.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "  Issuer:   {}",
        result.issuer_cn.as_deref().unwrap_or("-")
    );

    out
}

fn chain_label(index: usize, length: usize) -> &'static str {
    if index == 0 {
        "Leaf"
    } else if index == length - 1 {
        "Root"
    } else {
        "Intermediate"
    }
}

pub fn render_chain(summary: &ChainSummary) -> String {
    let mut out = String::new();
    section_header(&mut out, &format!("Certificate chain {}", summary.host));

    let completeness = if summary.is_complete {
        "complete".green()
    } else {
        "incomplete (no root presented)".yellow()
    };
    let _ = writeln!(
        out,
        "  Length: {}  ({})",
        summary.chain_length, completeness
    );

    for (index, cert) in summary.chain.iter().enumerate() {
        let label = format!("#{} {}", index, chain_label(index, summary.chain_length));
        write_certificate(&mut out, &label, cert);
    }

    out
}

pub fn render_batch(entries: &[BatchEntry]) -> String {
    let mut out = String::new();
    section_header(&mut out, &format!("Batch results ({} targets)", entries.len()));

    for entry in entries {
        let anomaly = &entry.anomaly;
        let kinds: Vec<&str> = anomaly.anomalies().iter().map(|a| a.kind.as_str()).collect();
        let _ = writeln!(
            out,
            "  {:<40} {:>3}  {:<2}  {}  {}",
            format!("{}:{}", entry.host, entry.port),
            anomaly.score(),
            format_grade(anomaly.grade()),
            format_status(anomaly.status()),
            kinds.join(", ").dimmed()
        );
    }

    let count = |status: Status| entries.iter().filter(|e| e.status() == status).count();
    let _ = writeln!(
        out,
        "\n  {} safe, {} suspicious, {} dangerous",
        count(Status::Safe).to_string().green(),
        count(Status::Suspicious).to_string().yellow(),
        count(Status::Dangerous).to_string().red()
    );

    out
}
