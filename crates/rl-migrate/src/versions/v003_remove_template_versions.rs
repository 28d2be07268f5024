//! Remove template versions table.
//!
//! The upgrade checks the live schema rather than trusting history, so it is
//! safe on databases where the table was already removed. The downgrade only
//! brings back the empty table, and only when the context allows it.

use super::template_versions_table;
use crate::revision::{MigrationContext, Revision};
use async_trait::async_trait;
use rl_db::{DatabaseCore, DatabaseSchema, DbResult};

const TABLE: &str = "template_versions";

pub struct RemoveTemplateVersions;

#[async_trait]
impl Revision for RemoveTemplateVersions {
    fn id(&self) -> &'static str {
        super::REMOVE_TEMPLATE_VERSIONS
    }

    fn down_revision(&self) -> Option<&'static str> {
        Some(super::ADD_NOTIFICATION_TABLES)
    }

    fn message(&self) -> &'static str {
        "remove template versions table"
    }

    async fn upgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()> {
        if ctx.db.table_exists(TABLE).await? {
            ctx.db.drop_table(TABLE).await
        } else {
            log::info!("{TABLE} not present, nothing to drop");
            Ok(())
        }
    }

    async fn downgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()> {
        if !ctx.capabilities.restore_dropped_tables {
            log::info!(
                "Not restoring {TABLE} on {}: restore_dropped_tables is off",
                ctx.db.db_type()
            );
            return Ok(());
        }
        // Structure only; the rows dropped on upgrade are gone
        ctx.db.create_table(&template_versions_table()).await
    }
}
