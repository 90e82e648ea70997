// ExpiryCommand - Days left on the leaf certificate
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use super::{Command, CommandContext, CommandStatus};
use crate::Result;
use crate::certificates::ExpiryStatus;
use crate::output::terminal::render_expiry;
use crate::scanner::CertificateScanner;
use crate::utils::network::Target;
use async_trait::async_trait;

pub struct ExpiryCommand {
    ctx: CommandContext,
    target: Target,
    warn_days: u32,
}

impl ExpiryCommand {
    pub fn new(ctx: CommandContext, target: Target, warn_days: u32) -> Self {
        Self {
            ctx,
            target,
            warn_days,
        }
    }
}

#[async_trait]
impl Command for ExpiryCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let scanner = CertificateScanner::new(self.ctx.config.clone());
        let result = scanner
            .check_expiry(&self.target.hostname, self.target.port, self.warn_days)
            .await?;

        self.ctx.emit(&result, render_expiry)?;

        Ok(if result.status == ExpiryStatus::Expired {
            CommandStatus::Dangerous
        } else {
            CommandStatus::Success
        })
    }

    fn name(&self) -> &'static str {
        "ExpiryCommand"
    }
}
