// Command trait - Defines the interface for all command implementations
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use crate::Result;
use crate::anomaly::Status;
use crate::output::OutputFormat;
use crate::output::json::generate_json;
use crate::scanner::ScannerConfig;
use async_trait::async_trait;
use serde::Serialize;

/// How a command finished, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Everything scanned; nothing dangerous
    Success,
    /// The scan itself failed
    ScanFailed,
    /// At least one result was classified dangerous
    Dangerous,
}

impl CommandStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::ScanFailed => 1,
            CommandStatus::Dangerous => 2,
        }
    }

    pub fn from_statuses<I: IntoIterator<Item = Status>>(statuses: I) -> Self {
        if statuses.into_iter().any(|s| s == Status::Dangerous) {
            CommandStatus::Dangerous
        } else {
            CommandStatus::Success
        }
    }
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: ScannerConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    /// Print `value` as JSON or through the terminal renderer
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, render: impl FnOnce(&T) -> String) -> Result<()> {
        match self.format {
            OutputFormat::Terminal => print!("{}", render(value)),
            OutputFormat::Json => println!("{}", generate_json(value, false)?),
            OutputFormat::JsonPretty => println!("{}", generate_json(value, true)?),
        }
        Ok(())
    }
}

/// Command trait - one operational mode of the CLI
#[async_trait]
pub trait Command: Send + Sync {
    /// Execute the command asynchronously
    async fn execute(&self) -> Result<CommandStatus>;

    /// Get a human-readable name for this command (for logging/debugging)
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandStatus::Success.exit_code(), 0);
        assert_eq!(CommandStatus::ScanFailed.exit_code(), 1);
        assert_eq!(CommandStatus::Dangerous.exit_code(), 2);
    }

    #[test]
    fn test_from_statuses() {
        assert_eq!(
            CommandStatus::from_statuses([Status::Safe, Status::Suspicious]),
            CommandStatus::Success
        );
        assert_eq!(
            CommandStatus::from_statuses([Status::Safe, Status::Dangerous]),
            CommandStatus::Dangerous
        );
        assert_eq!(CommandStatus::from_statuses([]), CommandStatus::Success);
    }
}
