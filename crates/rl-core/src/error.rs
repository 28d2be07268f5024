//! Error types for rl-core

use thiserror::Error;

/// Core error type for Revlane
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Revision id is empty or contains characters outside `[A-Za-z0-9_]`
    #[error("[E004] Invalid revision id '{id}': {reason}")]
    InvalidRevisionId { id: String, reason: String },

    /// E005: Two revisions share an id
    #[error("[E005] Duplicate revision id: {id}")]
    DuplicateRevision { id: String },

    /// E006: A revision (or its down_revision) is not part of the history
    #[error("[E006] Unknown revision: {id}")]
    UnknownRevision { id: String },

    /// E007: The down_revision chain loops back on itself
    #[error("[E007] Circular revision history detected: {cycle}")]
    CircularHistory { cycle: String },

    /// E008: More than one revision has no successor
    #[error("[E008] Multiple head revisions: {heads}. Branching histories are not supported")]
    MultipleHeads { heads: String },

    /// E009: Zero or several revisions without a down_revision
    #[error("[E009] Revision history must have exactly one base, found: {bases}")]
    InvalidBase { bases: String },

    /// E010: A partial revision id matched more than one revision
    #[error("[E010] Revision prefix '{prefix}' is ambiguous: {candidates}")]
    AmbiguousRevision { prefix: String, candidates: String },

    /// E011: IO error with path context
    #[error("[E011] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
