// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use crate::scanner::ScannerConfig;
use crate::security::validate_timeout_ms;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod output_args;
mod target_args;

pub use output_args::OutputArgs;
pub use target_args::{BatchArgs, ExpiryArgs, TargetArgs};

/// certsentry - TLS certificate scanner and anomaly detector
#[derive(Parser, Debug, Clone)]
#[command(author, version, long_about = None)]
#[command(name = "certsentry")]
#[command(about = "TLS certificate scanner and anomaly detector", long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Handshake timeout in milliseconds (1000-30000)
    #[arg(long = "timeout-ms", value_name = "MSEC", global = true)]
    pub timeout_ms: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Handshake with a host and show its certificate
    Scan(TargetArgs),

    /// Show the certificate chain a host presents
    Chain(TargetArgs),

    /// Check how long the leaf certificate remains valid
    Expiry(ExpiryArgs),

    /// Run the anomaly rules and score the host
    Anomaly(TargetArgs),

    /// Score many hosts concurrently
    Batch(BatchArgs),
}

impl Args {
    /// Load the configuration file (or defaults) and apply CLI overrides
    pub fn load_config(&self) -> crate::Result<ScannerConfig> {
        let mut config = match &self.config {
            Some(path) => ScannerConfig::from_file(path)?,
            None => ScannerConfig::default(),
        };

        if let Some(timeout_ms) = self.timeout_ms {
            validate_timeout_ms(timeout_ms)?;
            config.timeout_ms = timeout_ms;
        }

        if let Commands::Batch(batch) = &self.command {
            if !batch.ports.is_empty() {
                config.ports = batch.ports.clone();
            }
            if let Some(max) = batch.max_concurrent {
                config.max_concurrent_scans = max;
            }
        }

        config.validate()?;
        Ok(config)
    }
}
