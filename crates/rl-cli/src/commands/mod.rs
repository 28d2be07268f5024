//! CLI command implementations

pub(crate) mod common;
pub(crate) mod current;
pub(crate) mod downgrade;
pub(crate) mod history;
pub(crate) mod inspect;
pub(crate) mod stamp;
pub(crate) mod upgrade;
