// ChainCommand - Presented certificate chain of one target
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use super::{Command, CommandContext, CommandStatus};
use crate::Result;
use crate::output::terminal::render_chain;
use crate::scanner::CertificateScanner;
use crate::utils::network::Target;
use async_trait::async_trait;

pub struct ChainCommand {
    ctx: CommandContext,
    target: Target,
}

impl ChainCommand {
    pub fn new(ctx: CommandContext, target: Target) -> Self {
        Self { ctx, target }
    }
}

#[async_trait]
impl Command for ChainCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let scanner = CertificateScanner::new(self.ctx.config.clone());
        let summary = scanner
            .fetch_chain(&self.target.hostname, self.target.port)
            .await?;

        self.ctx.emit(&summary, render_chain)?;
        Ok(CommandStatus::Success)
    }

    fn name(&self) -> &'static str {
        "ChainCommand"
    }
}
