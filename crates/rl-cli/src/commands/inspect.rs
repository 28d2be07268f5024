//! Inspect command implementation

use anyhow::{bail, Context, Result};
use rl_db::{DatabaseSchema, SchemaSnapshot};

use crate::cli::{GlobalArgs, InspectArgs};
use crate::context::RuntimeContext;

/// Execute the inspect command
pub async fn execute(args: &InspectArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let db = ctx.db.as_ref();

    match &args.table {
        Some(table) => {
            if !db.table_exists(table).await? {
                bail!("Table '{}' not found in {}", table, ctx.database.path);
            }
            let snapshot = SchemaSnapshot::capture_table(db, table)
                .await
                .with_context(|| format!("Failed to inspect {table}"))?;
            print!("{snapshot}");
        }
        None => {
            let snapshot = SchemaSnapshot::capture(db)
                .await
                .context("Failed to inspect schema")?;
            println!("{} ({})", ctx.database.path, ctx.database.dialect);
            println!();
            print!("{snapshot}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "inspect_test.rs"]
mod tests;
