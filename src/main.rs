// caa-log-checker - Audit CA issuance logs for missing CAA checks
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

use anyhow::{Context, Result};
use caa_log_checker::commands::{AuditCommand, Command};
use caa_log_checker::{Args, AuditError};
use clap::Parser;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Issuances were found without a covering CAA check
const EXIT_FINDINGS: u8 = 1;
/// The audit could not be completed (bad input, unreadable file, bad flags)
const EXIT_FAILURE: u8 = 2;

fn init_logging(args: &Args) -> Result<()> {
    // --quiet / --verbose win over RUST_LOG
    let log_level = args
        .output
        .log_level()
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse::<Level>().ok())
        })
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(!args.output.no_color)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = init_logging(&args) {
        eprintln!("Error: {:?}", err);
        return ExitCode::from(EXIT_FAILURE);
    }
    if args.output.no_color {
        colored::control::set_override(false);
    }

    let quiet = args.output.quiet;
    let command = AuditCommand::new(args);
    info!(command = command.name(), "caa-log-checker v{}", env!("CARGO_PKG_VERSION"));

    match command.execute() {
        Ok(()) => {
            info!("All issuances were covered by CAA checks");
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<AuditError>() {
            Some(AuditError::MissingCaaChecks { count, report }) => {
                error!(count = *count, "Issuances were missing CAA checks");
                // the terminal report already lists them unless suppressed
                if quiet {
                    eprintln!("{}", report);
                }
                ExitCode::from(EXIT_FINDINGS)
            }
            _ => {
                error!("Audit failed: {:#}", err);
                ExitCode::from(EXIT_FAILURE)
            }
        },
    }
}
