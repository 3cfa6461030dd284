// Output format configuration arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;
use tracing::Level;

/// Output format and display options
///
/// This struct contains all arguments related to the report and logging:
/// JSON export, colors, verbosity.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the report as JSON to FILE
    #[arg(long = "json", value_name = "FILE", id = "output_json")]
    pub json: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(long = "json-pretty")]
    pub json_pretty: bool,

    /// Quiet mode (warnings and errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose level (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl OutputArgs {
    /// Log level requested on the command line, if any. `RUST_LOG` applies otherwise.
    pub fn log_level(&self) -> Option<Level> {
        if self.quiet {
            return Some(Level::WARN);
        }
        match self.verbose {
            0 => None,
            1 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        }
    }
}
