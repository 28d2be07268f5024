//! Baseline: users, templates and template versions.

use crate::revision::{MigrationContext, Revision};
use async_trait::async_trait;
use rl_db::{
    ColumnDef, ColumnType, DatabaseSchema, DbResult, DefaultValue, IndexDef, TableDef,
};

pub struct InitialSchema;

fn users_table() -> TableDef {
    TableDef::new("users")
        .col(ColumnDef::new("id", ColumnType::Integer).not_null().auto_increment())
        .col(ColumnDef::new("email", ColumnType::String(255)).not_null())
        .col(ColumnDef::new("username", ColumnType::String(100)).not_null())
        .col(
            ColumnDef::new("created_at", ColumnType::DateTime)
                .not_null()
                .default(DefaultValue::Now),
        )
        .primary_key(&["id"])
}

fn templates_table() -> TableDef {
    TableDef::new("templates")
        .col(ColumnDef::new("id", ColumnType::Integer).not_null().auto_increment())
        .col(ColumnDef::new("name", ColumnType::String(100)).not_null())
        .col(ColumnDef::new("content", ColumnType::Text).not_null())
        .col(ColumnDef::new("created_by", ColumnType::Integer))
        .col(
            ColumnDef::new("created_at", ColumnType::DateTime)
                .not_null()
                .default(DefaultValue::Now),
        )
        .primary_key(&["id"])
        .foreign_key("created_by", "users", "id")
}

/// Shape of `template_versions`, shared with the revision that retires it
pub fn template_versions_table() -> TableDef {
    TableDef::new("template_versions")
        .col(ColumnDef::new("id", ColumnType::Integer).not_null().auto_increment())
        .col(ColumnDef::new("template_id", ColumnType::Integer).not_null())
        .col(ColumnDef::new("version", ColumnType::String(20)).not_null())
        .col(ColumnDef::new("changes", ColumnType::Json))
        .col(ColumnDef::new("created_at", ColumnType::DateTime).default(DefaultValue::Now))
        .col(ColumnDef::new("created_by", ColumnType::Integer))
        .primary_key(&["id"])
        .foreign_key("template_id", "templates", "id")
        .foreign_key("created_by", "users", "id")
}

#[async_trait]
impl Revision for InitialSchema {
    fn id(&self) -> &'static str {
        super::INITIAL_SCHEMA
    }

    fn down_revision(&self) -> Option<&'static str> {
        None
    }

    fn message(&self) -> &'static str {
        "create users and templates tables"
    }

    async fn upgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()> {
        ctx.db.create_table(&users_table()).await?;
        ctx.db
            .create_index(&IndexDef::new("ix_users_email", "users").col("email").unique())
            .await?;
        ctx.db.create_table(&templates_table()).await?;
        ctx.db.create_table(&template_versions_table()).await
    }

    async fn downgrade(&self, ctx: &MigrationContext<'_>) -> DbResult<()> {
        // May already be gone if a later downgrade chose not to restore it
        if ctx.db.table_exists("template_versions").await? {
            ctx.db.drop_table("template_versions").await?;
        }
        ctx.db.drop_table("templates").await?;
        ctx.db.drop_table("users").await
    }
}
