// caa-log-checker - Audit CA issuance logs for missing CAA checks
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

//! caa-log-checker verifies that every certificate issuance recorded in the
//! RA logs was preceded, within a bounded window, by a CAA check for the
//! issued name recorded in the VA logs.

pub mod audit;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logs;

// Re-export commonly used types
pub use crate::audit::{AuditConfig, AuditReport, Auditor};
pub use crate::cli::Args;
pub use crate::error::AuditError;

/// Result type for command-level operations
pub type Result<T> = anyhow::Result<T>;

/// Error type for command-level operations
pub use anyhow::Error;
