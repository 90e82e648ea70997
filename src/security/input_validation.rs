//! Input Validation Module
//!
//! Checks caller-supplied scan parameters before any network activity:
//! hostnames, ports, timeouts and expiry warning windows.

use crate::constants::{MAX_TIMEOUT_MS, MAX_WARN_DAYS, MIN_TIMEOUT_MS};
use crate::error::ScanError;
use std::net::IpAddr;
use thiserror::Error;

/// Maximum length for hostname (RFC 1035)
const MAX_HOSTNAME_LENGTH: usize = 253;

/// Characters never valid in a host, even a sloppy one
const FORBIDDEN_CHARS: [char; 14] = [
    '|', '&', ';', '$', '`', '<', '>', '(', ')', '{', '}', '\\', '/', '"',
];

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),
    #[error("Invalid port: {0}")]
    InvalidPort(String),
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
    #[error("Invalid warn_days: {0}")]
    InvalidWarnDays(String),
}

impl From<ValidationError> for ScanError {
    fn from(err: ValidationError) -> Self {
        ScanError::invalid_input(err.to_string())
    }
}

/// Validate a scan host.
///
/// IP literals are accepted as-is. Names must be non-empty, at most 253
/// characters, and free of whitespace, control and shell characters.
pub fn validate_hostname(hostname: &str) -> Result<(), ValidationError> {
    if hostname.is_empty() {
        return Err(ValidationError::InvalidHostname(
            "Hostname cannot be empty".to_string(),
        ));
    }

    if hostname.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    if hostname.len() > MAX_HOSTNAME_LENGTH {
        return Err(ValidationError::InvalidHostname(format!(
            "Hostname too long (max {} characters)",
            MAX_HOSTNAME_LENGTH
        )));
    }

    if let Some(ch) = hostname
        .chars()
        .find(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ValidationError::InvalidHostname(format!(
            "Hostname contains whitespace or control character {:?}",
            ch
        )));
    }

    if let Some(ch) = hostname.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(ValidationError::InvalidHostname(format!(
            "Hostname contains forbidden character: '{}'",
            ch
        )));
    }

    Ok(())
}

/// Validate port number (1-65535)
pub fn validate_port(port: u16) -> Result<(), ValidationError> {
    // u16 already constrains to 0-65535, but we reject 0
    if port == 0 {
        return Err(ValidationError::InvalidPort(
            "Port must be between 1 and 65535".to_string(),
        ));
    }
    Ok(())
}

/// Validate a user-supplied handshake timeout
pub fn validate_timeout_ms(timeout_ms: u64) -> Result<(), ValidationError> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&timeout_ms) {
        return Err(ValidationError::InvalidTimeout(format!(
            "{}ms is outside {}-{}ms",
            timeout_ms, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS
        )));
    }
    Ok(())
}

/// Validate an expiry warning window
pub fn validate_warn_days(warn_days: u32) -> Result<(), ValidationError> {
    if warn_days == 0 || warn_days > MAX_WARN_DAYS {
        return Err(ValidationError::InvalidWarnDays(format!(
            "must be between 1 and {}, got {}",
            MAX_WARN_DAYS, warn_days
        )));
    }
    Ok(())
}

/// Validate a host/port pair
pub fn validate_target(hostname: &str, port: u16) -> Result<(), ValidationError> {
    validate_hostname(hostname)?;
    validate_port(port)
}
