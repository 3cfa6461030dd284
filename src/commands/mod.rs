// Commands module - Command Pattern implementation
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

mod audit;
mod command;

pub use audit::AuditCommand;
pub use command::Command;
