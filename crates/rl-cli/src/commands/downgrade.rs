//! Downgrade command implementation

use anyhow::{Context, Result};
use rl_migrate::Direction;

use crate::cli::{DowngradeArgs, GlobalArgs};
use crate::commands::common::{describe_version, parse_target, print_steps};
use crate::context::RuntimeContext;

/// Execute the downgrade command
pub async fn execute(args: &DowngradeArgs, global: &GlobalArgs) -> Result<()> {
    let target = parse_target(&args.revision)?;
    let ctx = RuntimeContext::new(global).await?;

    if args.dry_run {
        let plan = ctx
            .migrator
            .plan(Direction::Downgrade, &target)
            .await
            .context("Failed to plan downgrade")?;
        println!("Would revert {} revision(s) on {}:", plan.len(), ctx.config.name);
        print_steps(&plan);
        return Ok(());
    }

    let steps = ctx
        .migrator
        .downgrade(&target)
        .await
        .with_context(|| format!("Downgrade to {target} failed"))?;
    let current = ctx.migrator.current().await?;

    if steps.is_empty() {
        println!("Already at {}", describe_version(current.as_ref()));
        return Ok(());
    }

    println!("Downgrading {}:", ctx.config.name);
    print_steps(&steps);
    if !ctx.migrator.capabilities().restore_dropped_tables {
        println!(
            "  note: {} does not restore dropped tables on downgrade",
            ctx.database.dialect
        );
    }
    println!();
    println!(
        "Reverted {} revision(s), now at {}",
        steps.len(),
        describe_version(current.as_ref())
    );
    Ok(())
}

#[cfg(test)]
#[path = "downgrade_test.rs"]
mod tests;
