// Output format configuration arguments
// Copyright (C) 2025 certsentry contributors
// Licensed under GPL-3.0

use crate::output::OutputFormat;
use clap::Args;

/// Output format and display options
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Print results as compact JSON on stdout
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Print results as pretty JSON on stdout
    #[arg(long = "json-pretty", global = true)]
    pub json_pretty: bool,

    /// Quiet mode (no progress bar)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

impl OutputArgs {
    pub fn format(&self) -> OutputFormat {
        OutputFormat::from_flags(self.json, self.json_pretty)
    }
}
