// Scanner module - Public scan entry points composing connector, parser, chain
// walker and anomaly engine

pub mod config;
pub mod mass;
pub mod result;

pub use config::ScannerConfig;
pub use mass::{BatchEntry, BatchScanner};
pub use result::{ChainSummary, ScanOutcome, ScanResult};

use crate::anomaly::{AnomalyCheckResult, AnomalyEngine};
use crate::certificates::{CertificateChain, ExpiryCheckResult, walk_chain};
use crate::error::ScanError;
use crate::security::{validate_target, validate_warn_days};
use crate::tls::{TlsConnection, TlsConnector};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Certificate scanner.
///
/// Holds configuration only; every call opens its own connection and keeps
/// nothing afterwards, so one scanner can serve any number of concurrent
/// scans.
pub struct CertificateScanner {
    config: ScannerConfig,
    engine: AnomalyEngine,
}

impl Default for CertificateScanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl CertificateScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            engine: AnomalyEngine::default(),
        }
    }

    /// Use a custom rule battery instead of the built-in one
    pub fn with_engine(config: ScannerConfig, engine: AnomalyEngine) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Handshake with `host:port` and capture its certificate chain.
    ///
    /// Never fails: connection problems and malformed certificates come back
    /// as a failed `ScanResult`.
    pub async fn scan_host(&self, host: &str, port: u16, timeout: Duration) -> ScanResult {
        match self.capture(host, port, timeout).await {
            Ok((chain, connection)) => {
                info!(
                    "Scanned {}:{} ({} certificate(s), {})",
                    host,
                    port,
                    chain.len(),
                    connection.tls_version.as_deref().unwrap_or("unknown")
                );
                ScanResult::success(
                    host,
                    port,
                    chain,
                    connection.tls_version,
                    connection.cipher_suite,
                )
            }
            Err(e) => {
                warn!("Scan of {}:{} failed: {}", host, port, e);
                ScanResult::failure(host, port, e.to_string())
            }
        }
    }

    /// Scan and evaluate the anomaly rules against the leaf certificate.
    ///
    /// A failed scan yields a single critical `scan_failed` anomaly with
    /// score 0.
    pub async fn check_anomaly(&self, host: &str, port: u16) -> AnomalyCheckResult {
        let scan = self.scan_host(host, port, self.config.timeout()).await;
        self.evaluate(&scan)
    }

    /// Classify a completed scan
    pub fn evaluate(&self, scan: &ScanResult) -> AnomalyCheckResult {
        match scan.certificate() {
            Some(certificate) => {
                let result = self
                    .engine
                    .assess(&scan.host, certificate, scan.tls_version());
                debug!(
                    "{}: score {} ({}), {} anomalies",
                    scan.host,
                    result.score(),
                    result.status(),
                    result.anomalies().len()
                );
                result
            }
            None => AnomalyCheckResult::scan_failed(scan.host.clone()),
        }
    }

    /// Days left on the leaf certificate, classified against `warn_days`
    pub async fn check_expiry(
        &self,
        host: &str,
        port: u16,
        warn_days: u32,
    ) -> Result<ExpiryCheckResult, ScanError> {
        validate_warn_days(warn_days)?;

        let (chain, _) = self.capture(host, port, self.config.timeout()).await?;
        Ok(ExpiryCheckResult::from_certificate(
            host,
            &chain.leaf,
            warn_days,
            Utc::now(),
        ))
    }

    /// The chain the host presents, with its length and completeness
    pub async fn fetch_chain(&self, host: &str, port: u16) -> Result<ChainSummary, ScanError> {
        let (chain, _) = self.capture(host, port, self.config.timeout()).await?;
        Ok(ChainSummary::new(host, chain))
    }

    async fn capture(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<(CertificateChain, TlsConnection), ScanError> {
        validate_target(host, port)?;

        let connection = TlsConnector::new(timeout).connect(host, port).await?;
        let chain = walk_chain(&connection.peer)?;

        Ok((chain, connection))
    }
}
