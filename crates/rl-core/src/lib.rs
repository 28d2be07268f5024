//! rl-core - Core library for Revlane
//!
//! This crate provides the shared types used across all Revlane components:
//! project configuration parsing, the [`RevisionId`] newtype, SQL identifier
//! helpers, and the [`RevisionGraph`] that orders a revision history.

pub mod config;
pub mod error;
pub mod graph;
pub mod revision_id;
pub mod sql_utils;

pub use config::{CapabilityOverrides, Config, DatabaseConfig, Dialect, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use graph::RevisionGraph;
pub use revision_id::RevisionId;
