// BatchCommand - Score many targets with bounded concurrency
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use super::{Command, CommandContext, CommandStatus};
use crate::Result;
use crate::output::terminal::render_batch;
use crate::scanner::{BatchEntry, BatchScanner, CertificateScanner};
use crate::utils::network::Target;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct BatchCommand {
    ctx: CommandContext,
    targets: Vec<Target>,
}

impl BatchCommand {
    pub fn new(ctx: CommandContext, targets: Vec<Target>) -> Self {
        Self { ctx, targets }
    }
}

#[async_trait]
impl Command for BatchCommand {
    async fn execute(&self) -> Result<CommandStatus> {
        info!("Batch scanning {} target(s)", self.targets.len());

        let scanner = Arc::new(CertificateScanner::new(self.ctx.config.clone()));
        let show_progress = !self.ctx.quiet && !self.ctx.format.is_json();
        let entries = BatchScanner::new(scanner, self.targets.clone())
            .with_progress(show_progress)
            .run()
            .await;

        self.ctx.emit(entries.as_slice(), render_batch)?;

        Ok(CommandStatus::from_statuses(entries.iter().map(BatchEntry::status)))
    }

    fn name(&self) -> &'static str {
        "BatchCommand"
    }
}
