// certsentry - TLS certificate scanning and anomaly-detection engine
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

//! certsentry connects to TLS endpoints, captures the certificate chain they
//! present (trusted or not) and scores it against a fixed set of anomaly
//! rules: expiry, not-yet-valid, self-signed, weak protocol and hostname
//! mismatch.

pub mod anomaly;
pub mod certificates;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod output;
pub mod rating;
pub mod scanner;
pub mod security;
pub mod tls;
pub mod utils;

// Re-export commonly used types
pub use crate::anomaly::{Anomaly, AnomalyCheckResult, AnomalyType, Severity, Status};
pub use crate::cli::Args;
pub use crate::error::ScanError;
pub use crate::output::OutputFormat;
pub use crate::scanner::{CertificateScanner, ScanResult, ScannerConfig};

/// Result type for certsentry application-level operations
pub type Result<T> = anyhow::Result<T>;

/// Error type for certsentry application-level operations
pub use anyhow::Error;
