//! Upgrade command implementation

use anyhow::{Context, Result};
use rl_migrate::Direction;

use crate::cli::{GlobalArgs, UpgradeArgs};
use crate::commands::common::{describe_version, parse_target, print_steps};
use crate::context::RuntimeContext;

/// Execute the upgrade command
pub async fn execute(args: &UpgradeArgs, global: &GlobalArgs) -> Result<()> {
    let target = parse_target(&args.revision)?;
    let ctx = RuntimeContext::new(global).await?;

    if args.dry_run {
        let plan = ctx
            .migrator
            .plan(Direction::Upgrade, &target)
            .await
            .context("Failed to plan upgrade")?;
        println!("Would apply {} revision(s) to {}:", plan.len(), ctx.config.name);
        print_steps(&plan);
        return Ok(());
    }

    let steps = ctx
        .migrator
        .upgrade(&target)
        .await
        .with_context(|| format!("Upgrade to {target} failed"))?;
    let current = ctx.migrator.current().await?;

    if steps.is_empty() {
        println!("Already at {}", describe_version(current.as_ref()));
    } else {
        println!("Upgrading {}:", ctx.config.name);
        print_steps(&steps);
        println!();
        println!(
            "Applied {} revision(s), now at {}",
            steps.len(),
            describe_version(current.as_ref())
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "upgrade_test.rs"]
mod tests;
