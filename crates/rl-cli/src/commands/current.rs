//! Current command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::describe_version;
use crate::context::RuntimeContext;

/// Execute the current command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let current = ctx.migrator.current().await?;

    let is_head = current.as_ref() == ctx.migrator.graph().head();
    println!(
        "{}{}",
        describe_version(current.as_ref()),
        if is_head { " (head)" } else { "" }
    );
    Ok(())
}
