// Commands module - Command Pattern implementation
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

mod command;
mod router;

// Individual command implementations
mod anomaly;
mod batch;
mod chain;
mod expiry;
mod scan;

pub use command::{Command, CommandContext, CommandStatus};
pub use router::CommandRouter;

pub use anomaly::AnomalyCommand;
pub use batch::BatchCommand;
pub use chain::ChainCommand;
pub use expiry::ExpiryCommand;
pub use scan::ScanCommand;
