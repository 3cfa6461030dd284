// Coverage window configuration arguments
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::audit::{DEFAULT_COVERAGE_WINDOW, parse_day};
use chrono::NaiveDate;
use clap::Args;
use std::time::Duration;

/// Coverage window and audit scope options
///
/// Durations use humantime syntax (`8h`, `90m`, `1h 30m`, `250ms`).
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// How long after a CAA check an issuance for that name is covered
    #[arg(long = "window", value_name = "DURATION", default_value = "8h", value_parser = humantime::parse_duration)]
    pub window: Duration,

    /// How much slop to allow when comparing RA and VA timestamps
    #[arg(long = "time-tolerance", value_name = "DURATION", default_value = "0s", value_parser = humantime::parse_duration)]
    pub time_tolerance: Duration,

    /// Day at which to start checking issuances (inclusive, YYYYMMDD). Requires --latest
    #[arg(long = "earliest", value_name = "YYYYMMDD", value_parser = parse_day)]
    pub earliest: Option<NaiveDate>,

    /// Day at which to stop checking issuances (exclusive, YYYYMMDD). Requires --earliest
    #[arg(long = "latest", value_name = "YYYYMMDD", value_parser = parse_day)]
    pub latest: Option<NaiveDate>,
}

impl Default for WindowArgs {
    fn default() -> Self {
        Self {
            window: DEFAULT_COVERAGE_WINDOW,
            time_tolerance: Duration::ZERO,
            earliest: None,
            latest: None,
        }
    }
}
