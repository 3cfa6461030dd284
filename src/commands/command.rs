// Command trait - Defines the interface for all command implementations
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::Result;

/// Command trait - one operational mode of caa-log-checker
///
/// Each command validates its own preconditions, runs to completion and
/// returns a Result. Audits are single-pass batch jobs, so execution is
/// synchronous.
pub trait Command {
    /// Execute the command
    ///
    /// # Errors
    /// Operational failures and audit findings are both returned as errors;
    /// findings downcast to `AuditError::MissingCaaChecks`.
    fn execute(&self) -> Result<()>;

    /// Get a human-readable name for this command (for logging/debugging)
    fn name(&self) -> &'static str;
}
