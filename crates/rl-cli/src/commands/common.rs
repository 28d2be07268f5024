//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use rl_core::RevisionId;
use rl_migrate::{MigrationStep, Target};

/// Parse a revision argument into a migration target
pub(crate) fn parse_target(raw: &str) -> Result<Target> {
    raw.parse::<Target>()
        .with_context(|| format!("Invalid revision argument '{raw}'"))
}

/// Display a recorded version, `base` when nothing is applied
pub(crate) fn describe_version(version: Option<&RevisionId>) -> String {
    version.map_or_else(|| "base".to_string(), |id| id.to_string())
}

/// Print a planned or applied step list
pub(crate) fn print_steps(steps: &[MigrationStep]) {
    for step in steps {
        println!(
            "  {:<9} {}  {}",
            step.direction.to_string(),
            step.revision,
            step.message
        );
    }
}
