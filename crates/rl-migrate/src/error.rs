//! Error types for the migration runner.

use crate::runner::Direction;
use rl_core::CoreError;
use rl_db::DbError;
use thiserror::Error;

/// Migration errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Reading or writing the version table failed (M001).
    #[error("[M001] Version table error: {0}")]
    VersionTableError(String),

    /// A revision's upgrade or downgrade failed and was rolled back (M002).
    #[error("[M002] {direction} of revision {revision} failed: {source}")]
    RevisionFailed {
        revision: String,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// Requested target cannot be reached in the requested direction (M003).
    #[error("[M003] Invalid migration target: {0}")]
    InvalidTarget(String),

    /// Transaction management error (M004).
    #[error("[M004] Migration transaction failed: {0}")]
    TransactionError(String),

    /// Revision history or configuration error (M005).
    #[error("[M005] {0}")]
    Core(#[from] CoreError),

    /// Database error outside a revision body (M006).
    #[error("[M006] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
