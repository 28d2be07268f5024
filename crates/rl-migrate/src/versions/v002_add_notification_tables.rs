//! Add notification tables.

use crate::revision::{MigrationContext, Revision};
use async_trait::async_trait;
use rl_db::{
    ColumnDef, ColumnType, DatabaseSchema, DbResult, DefaultValue, IndexDef, TableDef,
};

pub struct AddNotificationTables;

/// One user-facing notification per row
pub fn notifications_table() -> TableDef {
    TableDef::new("notifications")
        .col(ColumnDef::new("id", ColumnType::Integer).not_null().auto_increment())
        .col(ColumnDef::new("user_id", ColumnType::Integer).not_null())
        .col(ColumnDef::new("title", ColumnType::String(200)).not_null())
        .col(ColumnDef::new("body", ColumnType::Text).not_null())
        .col(ColumnDef::new("data", ColumnType::Json))
        .col(ColumnDef::new("type", ColumnType::String(50)).not_null())
        .col(
            ColumnDef::new("priority", ColumnType::String(20))
                .not_null()
                .default(DefaultValue::Str("normal".to_string())),
        )
        .col(
            ColumnDef::new("read", ColumnType::Boolean)
                .not_null()
                .default(DefaultValue::Bool(false)),
        )
        .col(ColumnDef::new("read_at", ColumnType::DateTime))
        .col(
            ColumnDef::new("created_at", ColumnType::DateTime)
                .not_null()
                .default(DefaultValue::Now),
        )
        .col(ColumnDef::new("expires_at", ColumnType::DateTime))
        .primary_key(&["id"])
        .foreign_key("user_id", "users", "id")
}

fn notification_indexes() -> [IndexDef; 3] {
    [
        IndexDef::new("ix_notifications_id", "notifications").col("id"),
        IndexDef::new("ix_notifications_type", "notifications").col("type"),
        IndexDef::new("ix_notifications_user_id", "notifications").col("user_id"),
    ]
}

#[async_trait]
impl Revision for AddNotificationTables {
    fn id(&self) -> &'static str {
        super::ADD_NOTIFICATION_TABLES
    }

    fn down_revision(&self) -> Option<&'static str> {
        Some(super::INITIAL_SCHEMA)
    }

    fn message(&self) -> &'static str {
        "add notification tables"
    }

    async fn upgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()> {
        ctx.db.create_table(&notifications_table()).await?;
        for index in notification_indexes() {
            ctx.db.create_index(&index).await?;
        }
        Ok(())
    }

    async fn downgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()> {
        ctx.db.drop_table("notifications").await
    }
}
