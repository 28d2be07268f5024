//! History command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, HistoryArgs, HistoryOutput};
use crate::context::RuntimeContext;

/// Execute the history command
pub async fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let history = ctx.migrator.history().await?;

    match args.output {
        HistoryOutput::Json => {
            let json =
                serde_json::to_string_pretty(&history).context("Failed to serialize history")?;
            println!("{json}");
        }
        HistoryOutput::Text => {
            for entry in &history {
                let mut markers = Vec::new();
                if entry.is_current {
                    markers.push("current");
                }
                if entry.is_head {
                    markers.push("head");
                }
                println!(
                    "[{}] {} -> {}  {}{}",
                    if entry.applied { "x" } else { " " },
                    entry.down_revision.as_deref().unwrap_or("<base>"),
                    entry.revision,
                    entry.message,
                    if markers.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", markers.join(", "))
                    }
                );
            }
        }
    }
    Ok(())
}
