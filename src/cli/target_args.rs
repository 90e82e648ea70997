// Target selection arguments
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use crate::scanner::ScannerConfig;
use crate::utils::network::Target;
use clap::Args;
use std::path::PathBuf;

/// A single scan target
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Target (host, host:port, [ipv6]:port or https:// URL)
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Port used when the target names none
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

impl TargetArgs {
    pub fn resolve(&self, config: &ScannerConfig) -> crate::Result<Target> {
        let default_port = self.port.unwrap_or(config.default_port);
        Ok(Target::parse(&self.target, default_port)?)
    }
}

/// Arguments for the `expiry` subcommand
#[derive(Args, Debug, Clone)]
pub struct ExpiryArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Warning window in days (1-365)
    #[arg(short = 'w', long = "warn-days")]
    pub warn_days: Option<u32>,
}

/// Arguments for the `batch` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Input file with one target per line
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Targets given directly on the command line
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Ports tried for targets that name none (comma separated)
    #[arg(long = "ports", value_delimiter = ',')]
    pub ports: Vec<u16>,

    /// Maximum concurrent scans
    #[arg(long = "max-concurrent", value_name = "N")]
    pub max_concurrent: Option<usize>,
}
