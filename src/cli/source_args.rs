// Log source arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use clap::Args;
use std::path::PathBuf;

/// Log sources to audit
///
/// Paths ending in `.gz` are decompressed transparently. Both flags accept
/// comma-separated lists and may be repeated.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Boulder RA log file(s) containing issuance events
    #[arg(
        long = "ra-log",
        value_name = "FILE",
        value_delimiter = ',',
        required = true
    )]
    pub ra_logs: Vec<PathBuf>,

    /// Boulder VA log file(s) containing CAA check events
    #[arg(
        long = "va-logs",
        value_name = "FILE",
        value_delimiter = ',',
        required = true
    )]
    pub va_logs: Vec<PathBuf>,
}
