// Error types for certsentry
//
// ScanError covers connection-level failures and malformed peer data. These
// never cross the public scanner entry points as errors: the orchestrator turns
// them into failed ScanResults or a scan_failed anomaly.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Error type for scanning operations
#[derive(Debug, Error)]
pub enum ScanError {
    /// The handshake did not complete within the configured budget
    #[error("connection timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// DNS resolution failed for the hostname
    #[error("DNS resolution failed for {hostname}: {details}")]
    DnsResolution { hostname: String, details: String },

    /// Connection was refused by the remote host
    #[error("connection refused by {addr}")]
    ConnectionRefused { addr: SocketAddr },

    /// Any other TCP connect failure
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// TLS negotiation failed
    #[error("TLS handshake failed: {details}")]
    Handshake { details: String },

    /// Handshake succeeded but the server presented no certificate
    #[error("no certificate received")]
    NoCertificate,

    /// Peer certificate fields could not be interpreted
    #[error("malformed certificate: {message}")]
    MalformedCertificate { message: String },

    /// Invalid input from the caller
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// OpenSSL-specific errors
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    /// Generic I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// The blocking handshake task panicked or was cancelled
    #[error("scan task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ScanError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ScanError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ScanError::MalformedCertificate {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ScanError::Timeout { .. })
    }
}
