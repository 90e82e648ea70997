// CommandRouter - Routes CLI arguments to appropriate Command
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use super::{
    AnomalyCommand, BatchCommand, ChainCommand, Command, CommandContext, ExpiryCommand,
    ScanCommand,
};
use crate::Result;
use crate::cli::{Args, BatchArgs, Commands};
use crate::scanner::ScannerConfig;
use crate::scanner::mass::{expand_targets, targets_from_file};
use crate::security::validate_warn_days;

/// CommandRouter turns parsed arguments into a ready-to-run Command.
///
/// Configuration is loaded and targets are parsed here, so a command never
/// starts with invalid input.
pub struct CommandRouter;

impl CommandRouter {
    pub fn route(args: Args) -> Result<Box<dyn Command>> {
        let config = args.load_config()?;
        let ctx = CommandContext {
            format: args.output.format(),
            quiet: args.output.quiet,
            config,
        };

        let command: Box<dyn Command> = match &args.command {
            Commands::Scan(target) => {
                let target = target.resolve(&ctx.config)?;
                Box::new(ScanCommand::new(ctx, target))
            }
            Commands::Chain(target) => {
                let target = target.resolve(&ctx.config)?;
                Box::new(ChainCommand::new(ctx, target))
            }
            Commands::Expiry(expiry) => {
                let target = expiry.target.resolve(&ctx.config)?;
                let warn_days = expiry.warn_days.unwrap_or(ctx.config.warn_days);
                validate_warn_days(warn_days)?;
                Box::new(ExpiryCommand::new(ctx, target, warn_days))
            }
            Commands::Anomaly(target) => {
                let target = target.resolve(&ctx.config)?;
                Box::new(AnomalyCommand::new(ctx, target))
            }
            Commands::Batch(batch) => {
                let inputs = Self::batch_inputs(batch, &ctx.config)?;
                let targets = expand_targets(&inputs, &ctx.config.ports)?;
                Box::new(BatchCommand::new(ctx, targets))
            }
        };

        Ok(command)
    }

    /// Targets from `--file`, the command line, then the config file, in that
    /// order of preference
    fn batch_inputs(batch: &BatchArgs, config: &ScannerConfig) -> Result<Vec<String>> {
        let mut inputs = Vec::new();

        if let Some(file) = &batch.file {
            inputs.extend(targets_from_file(file)?);
        }
        inputs.extend(batch.targets.iter().cloned());

        if inputs.is_empty() {
            inputs.extend(config.targets.iter().cloned());
        }

        if inputs.is_empty() {
            anyhow::bail!("No targets given: pass targets, --file, or set `targets` in the config");
        }

        Ok(inputs)
    }
}
