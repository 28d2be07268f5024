//! Registered revisions, oldest first.

mod v001_initial_schema;
mod v002_add_notification_tables;
mod v003_remove_template_versions;

pub use v001_initial_schema::{template_versions_table, InitialSchema};
pub use v002_add_notification_tables::{notifications_table, AddNotificationTables};
pub use v003_remove_template_versions::RemoveTemplateVersions;

use crate::revision::Revision;

pub const INITIAL_SCHEMA: &str = "3c7e1f9a2b40";
pub const ADD_NOTIFICATION_TABLES: &str = "8d41b6e0c2f5";
pub const REMOVE_TEMPLATE_VERSIONS: &str = "e5a09c3d7b18";

/// Every revision shipped with revlane
pub fn all() -> Vec<Box<dyn Revision>> {
    vec![
        Box::new(InitialSchema),
        Box::new(AddNotificationTables),
        Box::new(RemoveTemplateVersions),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rl_core::{RevisionGraph, RevisionId};

    #[test]
    fn test_revisions_form_a_chain() {
        let links: Vec<_> = all()
            .iter()
            .map(|r| {
                (
                    RevisionId::parse(r.id()).unwrap(),
                    r.down_revision().map(|d| RevisionId::parse(d).unwrap()),
                )
            })
            .collect();
        let graph = RevisionGraph::build(&links).unwrap();

        let order: Vec<&str> = graph.ordered().iter().map(|id| id.as_str()).collect();
        assert_eq!(
            order,
            vec![INITIAL_SCHEMA, ADD_NOTIFICATION_TABLES, REMOVE_TEMPLATE_VERSIONS]
        );
    }
}
