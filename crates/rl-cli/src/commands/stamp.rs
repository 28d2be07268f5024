//! Stamp command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, StampArgs};
use crate::commands::common::{describe_version, parse_target};
use crate::context::RuntimeContext;

/// Execute the stamp command
pub async fn execute(args: &StampArgs, global: &GlobalArgs) -> Result<()> {
    let target = parse_target(&args.revision)?;
    let ctx = RuntimeContext::new(global).await?;

    let previous = ctx.migrator.current().await?;
    let stamped = ctx
        .migrator
        .stamp(&target)
        .await
        .with_context(|| format!("Failed to stamp {target}"))?;

    println!(
        "Stamped {}: {} -> {}",
        ctx.config.name,
        describe_version(previous.as_ref()),
        describe_version(stamped.as_ref())
    );
    Ok(())
}

#[cfg(test)]
#[path = "stamp_test.rs"]
mod tests;
