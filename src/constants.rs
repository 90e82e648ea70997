// certsentry - TLS certificate scanning and anomaly-detection engine
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

//! Scanner constants
//!
//! Centralized defaults, limits and scoring parameters shared by the
//! connector, the rule engine and the CLI.

// =============================================================================
// Connection defaults
// =============================================================================

/// Port scanned when the caller does not name one
pub const DEFAULT_PORT: u16 = 443;

/// Handshake budget used by `scan_host` when none is given
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Lowest timeout accepted from user input
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Highest timeout accepted from user input
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// Upper bound on issuer-link hops followed by the chain walker.
///
/// Stops cyclic or absurdly long issuer structures that never reach a
/// self-issued root.
pub const MAX_CHAIN_DEPTH: usize = 32;

// =============================================================================
// Scoring
// =============================================================================

/// Score every evaluation starts from
pub const INITIAL_SCORE: i32 = 100;

/// Scores at or above this are `safe`
pub const SAFE_SCORE_THRESHOLD: u8 = 80;

/// Scores at or above this (and below the safe threshold) are `suspicious`
pub const SUSPICIOUS_SCORE_THRESHOLD: u8 = 50;

/// Expiry window that raises `certificate_expiring`
pub const EXPIRING_WARNING_DAYS: i64 = 30;

/// Expiry window that escalates `certificate_expiring` to high severity
pub const EXPIRING_CRITICAL_DAYS: i64 = 7;

/// Negotiated protocol versions considered weak
pub const WEAK_TLS_VERSIONS: &[&str] = &["TLSv1", "TLSv1.1", "SSLv3"];

// =============================================================================
// Expiry check
// =============================================================================

/// Default warning window for `check_expiry`
pub const DEFAULT_WARN_DAYS: u32 = 30;

/// Largest warning window accepted for `check_expiry`
pub const MAX_WARN_DAYS: u32 = 365;

// =============================================================================
// Batch scanning
// =============================================================================

/// Worker pool size for batch scans
pub const DEFAULT_MAX_CONCURRENT_SCANS: usize = 10;
