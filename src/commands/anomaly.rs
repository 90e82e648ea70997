// AnomalyCommand - Score one target against the anomaly rules
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use super::{Command, CommandContext, CommandStatus};
use crate::Result;
use crate::output::terminal::render_anomaly;
use crate::scanner::CertificateScanner;
use crate::utils::network::Target;
use async_trait::async_trait;

pub struct AnomalyCommand {
    ctx: CommandContext,
    target: Target,
}

impl AnomalyCommand {
    pub fn new(ctx: CommandContext, target: Target) -> Self {
        Self { ctx, target }
    }
}

#[async_trait]
impl Command for AnomalyCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        let scanner = CertificateScanner::new(self.ctx.config.clone());
        let result = scanner
            .check_anomaly(&self.target.hostname, self.target.port)
            .await;

        self.ctx.emit(&result, render_anomaly)?;
        Ok(CommandStatus::from_statuses([result.status()]))
    }

    fn name(&self) -> &'static str {
        "AnomalyCommand"
    }
}
