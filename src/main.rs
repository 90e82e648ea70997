// certsentry - TLS certificate scanning and anomaly-detection engine
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use certsentry::Args;
use certsentry::commands::CommandRouter;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging - respect RUST_LOG, keep stdout for results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args = Args::parse();

    let command = match CommandRouter::route(args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            return ExitCode::from(1);
        }
    };

    debug!("Running {}", command.name());

    match command.execute().await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(1)
        }
    }
}
