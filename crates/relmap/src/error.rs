//! Errors

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type returned by the insert engine.
///
/// Shape and metadata errors are detected before any SQL is issued and abort
/// with zero side effects. Execution errors propagate unchanged; the engine
/// performs no retry of its own.
#[derive(Error, Debug)]
pub enum Error {
    /// A zero-length batch was supplied.
    #[error("no elements in batch")]
    EmptyBatch,

    /// The supplied argument is not a usable record or mapping.
    #[error("unsupported insert argument: {0}")]
    InvalidShape(String),

    /// No table name could be resolved for the record.
    #[error("no table found for the record")]
    TableNotFound,

    /// A record field could not be read or written.
    #[error("cannot access field `{column}`: {reason}")]
    FieldAccess {
        /// Column whose accessor failed.
        column: String,
        /// Accessor failure detail.
        reason: String,
    },

    /// The underlying store rejected or failed the statement.
    #[error("statement execution failed: {0}")]
    Execution(String),

    /// The post-insert generated-key lookup failed or returned no rows.
    #[error("generated key retrieval failed: {0}")]
    KeyRetrieval(String),

    /// An iterative batch stopped early. Carries the number of rows inserted
    /// before the failing element together with the triggering error.
    #[error("batch aborted after {affected} rows: {source}")]
    PartialBatch {
        /// Rows successfully inserted before the failure.
        affected: u64,
        /// The error that stopped the batch.
        source: Box<Error>,
    },
}

impl Error {
    /// Shorthand for a field-access failure on `column`.
    pub(crate) fn field_access(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FieldAccess {
            column: column.into(),
            reason: reason.into(),
        }
    }
}
