// Batch Scanner - bounded parallel scanning of many targets

use super::{CertificateScanner, ScanResult};
use crate::Result;
use crate::anomaly::{AnomalyCheckResult, Status};
use crate::error::ScanError;
use crate::utils::network::Target;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::warn;

/// One scanned target with its raw scan and evaluation
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub host: String,
    pub port: u16,
    pub scan: ScanResult,
    pub anomaly: AnomalyCheckResult,
}

impl BatchEntry {
    pub fn status(&self) -> Status {
        self.anomaly.status()
    }
}

/// Batch scanner for scanning multiple targets
pub struct BatchScanner {
    scanner: Arc<CertificateScanner>,
    targets: Vec<Target>,
    show_progress: bool,
}

impl BatchScanner {
    pub fn new(scanner: Arc<CertificateScanner>, targets: Vec<Target>) -> Self {
        Self {
            scanner,
            targets,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while scanning
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Scan every target with at most `max_concurrent_scans` in flight.
    ///
    /// Entries come back in target order regardless of completion order.
    pub async fn run(&self) -> Vec<BatchEntry> {
        let max_parallel = self.scanner.config().max_concurrent_scans.max(1);
        let timeout = self.scanner.config().timeout();

        let progress = if self.show_progress {
            let pb = ProgressBar::new(self.targets.len() as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        // Create semaphore to limit concurrent scans
        let semaphore = Arc::new(Semaphore::new(max_parallel));

        let mut tasks = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let target = target.clone();
            let scanner = Arc::clone(&self.scanner);
            let semaphore = Arc::clone(&semaphore);

            tasks.push(tokio::spawn(async move {
                let scan = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        scanner
                            .scan_host(&target.hostname, target.port, timeout)
                            .await
                    }
                    Err(e) => ScanResult::failure(&target.hostname, target.port, e.to_string()),
                };
                let anomaly = scanner.evaluate(&scan);
                BatchEntry {
                    host: target.hostname,
                    port: target.port,
                    scan,
                    anomaly,
                }
            }));
        }

        let mut entries = Vec::with_capacity(tasks.len());
        for (task, target) in tasks.into_iter().zip(&self.targets) {
            let entry = match task.await {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Scan task for {} failed: {}", target, e);
                    let scan = ScanResult::failure(&target.hostname, target.port, e.to_string());
                    BatchEntry {
                        host: target.hostname.clone(),
                        port: target.port,
                        anomaly: self.scanner.evaluate(&scan),
                        scan,
                    }
                }
            };
            progress.inc(1);
            progress.set_message(format!("Completed: {}", target));
            entries.push(entry);
        }

        progress.finish_and_clear();
        entries
    }
}

/// Expand raw target strings against a port list.
///
/// A target naming its own port (`host:8443`, a URL) yields one entry; a bare
/// host yields one entry per port.
pub fn expand_targets(inputs: &[String], ports: &[u16]) -> std::result::Result<Vec<Target>, ScanError> {
    let mut targets = Vec::new();

    for input in inputs {
        // port 0 stands for "none given": an explicit 0 is rejected by the parser
        let target = Target::parse(input, 0)?;
        if target.port == 0 {
            targets.extend(ports.iter().map(|port| Target::new(target.hostname.clone(), *port)));
        } else {
            targets.push(target);
        }
    }

    Ok(targets)
}

/// Load target lines from a file: one per line, blank lines and `#` comments
/// ignored
pub fn targets_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        anyhow::anyhow!("Failed to read target file {:?}: {}", path.as_ref(), e)
    })?;

    let targets: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if targets.is_empty() {
        anyhow::bail!("No targets found in file: {:?}", path.as_ref());
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyType;
    use crate::scanner::ScannerConfig;
    use crate::tls::test_support::{build_self_signed_certificate, spawn_tls_server};
    use std::io::Write;

    #[test]
    fn test_expand_targets() {
        let inputs = vec![
            "a.example.com".to_string(),
            "b.example.com:8443".to_string(),
            "https://c.example.com".to_string(),
        ];
        let targets = expand_targets(&inputs, &[443, 636]).unwrap();

        let rendered: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "a.example.com:443",
                "a.example.com:636",
                "b.example.com:8443",
                "c.example.com:443",
            ]
        );
    }

    #[test]
    fn test_expand_targets_rejects_bad_port() {
        let inputs = vec!["a.example.com:0".to_string()];
        assert!(expand_targets(&inputs, &[443]).is_err());
    }

    #[test]
    fn test_targets_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# production").unwrap();
        writeln!(file, "example.com").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  api.example.com:8443  ").unwrap();

        let targets = targets_from_file(file.path()).unwrap();
        assert_eq!(targets, vec!["example.com", "api.example.com:8443"]);
    }

    #[test]
    fn test_targets_from_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();
        assert!(targets_from_file(file.path()).is_err());
    }

    #[tokio::test]
    async fn test_run_preserves_order() {
        let (cert, key) = build_self_signed_certificate("batch.test", &["batch.test"]);
        let addr = spawn_tls_server(cert, key, vec![]);

        let unused_port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let config = ScannerConfig {
            timeout_ms: 1000,
            max_concurrent_scans: 2,
            ..Default::default()
        };
        let scanner = Arc::new(CertificateScanner::new(config));
        let targets = vec![
            Target::new("127.0.0.1", addr.port()),
            Target::new("127.0.0.1", unused_port),
            Target::new("127.0.0.1", addr.port()),
        ];

        let entries = BatchScanner::new(scanner, targets).run().await;

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].port, addr.port());
        assert!(entries[0].scan.is_success());
        assert_eq!(entries[1].port, unused_port);
        assert!(!entries[1].scan.is_success());
        assert!(entries[1].anomaly.has(AnomalyType::ScanFailed));
        assert!(entries[2].scan.is_success());
    }
}
