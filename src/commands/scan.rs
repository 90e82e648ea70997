// ScanCommand - Single target certificate scan
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use super::{Command, CommandContext, CommandStatus};
use crate::Result;
use crate::output::terminal::render_scan;
use crate::scanner::CertificateScanner;
use crate::utils::network::Target;
use async_trait::async_trait;

/// Handshake with one target and print what it presented
pub struct ScanCommand {
    ctx: CommandContext,
    target: Target,
}

impl ScanCommand {
    pub fn new(ctx: CommandContext, target: Target) -> Self {
        Self { ctx, target }
    }
}

#[async_trait]
impl Command for ScanCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let scanner = CertificateScanner::new(self.ctx.config.clone());
        let result = scanner
            .scan_host(
                &self.target.hostname,
                self.target.port,
                self.ctx.config.timeout(),
            )
            .await;

        self.ctx.emit(&result, render_scan)?;

        Ok(if result.is_success() {
            CommandStatus::Success
        } else {
            CommandStatus::ScanFailed
        })
    }

    fn name(&self) -> &'static str {
        "ScanCommand"
    }
}
