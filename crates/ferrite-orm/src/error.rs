//! Error types for the ORM.

use ferrite_sql_core::DecodeError;
use thiserror::Error;

/// ORM-specific errors.
///
/// Engine failures keep the SQLite extended result code and message.
#[derive(Debug, Error)]
pub enum Error {
    /// `get` found no row for the given primary key.
    #[error("no row found for the given primary key")]
    NotFound,

    /// A record type was used that is not registered in the catalog.
    #[error("type `{0}` is not mapped to this storage")]
    TypeNotMapped(&'static str),

    /// An accessor did not resolve to a column of any registered table.
    #[error("column `{0}` not found in any registered table")]
    ColumnNotFound(String),

    /// A by-primary-key operation was called on a table without one.
    #[error("table `{0}` has no primary key column")]
    NoPrimaryKey(&'static str),

    /// The number of provided key values does not match the primary key.
    #[error("primary key has {expected} column(s) but {got} value(s) were given")]
    PkArityMismatch {
        /// Primary-key column count.
        expected: usize,
        /// Provided value count.
        got: usize,
    },

    /// `begin_transaction` while a transaction is already active.
    #[error("cannot start a transaction within a transaction")]
    NestedTransaction,

    /// `commit`/`rollback` without an active transaction.
    #[error("no active transaction")]
    NoActiveTransaction,

    /// `update_all` called with an empty assignment list.
    #[error("incorrect set fields specified: the assignment list is empty")]
    EmptySet,

    /// `update_all` assignments reference more than one table.
    #[error("too many tables specified in the assignment list")]
    TooManyTables,

    /// A stored value could not be converted back to its field type.
    #[error("row decoding failed: {0}")]
    Decode(#[from] DecodeError),

    /// The engine rejected a `journal_mode` value.
    #[error("unexpected journal mode `{0}`")]
    UnknownJournalMode(String),

    /// Statement preparation failed.
    #[error("prepare failed (code {code}): {message}")]
    Prepare {
        /// SQLite extended result code.
        code: i32,
        /// Engine message.
        message: String,
    },

    /// Parameter binding failed.
    #[error("bind failed (code {code}): {message}")]
    Bind {
        /// SQLite extended result code.
        code: i32,
        /// Engine message.
        message: String,
    },

    /// Stepping a statement failed.
    #[error("step failed (code {code}): {message}")]
    Step {
        /// SQLite extended result code.
        code: i32,
        /// Engine message.
        message: String,
    },

    /// A one-shot exec (DDL, PRAGMA, introspection) failed.
    #[error("exec failed (code {code}): {message}")]
    Exec {
        /// SQLite extended result code.
        code: i32,
        /// Engine message.
        message: String,
    },
}

/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn sqlite_code(e: &rusqlite::Error) -> (i32, String) {
    match e {
        rusqlite::Error::SqliteFailure(ffi_err, message) => (
            ffi_err.extended_code,
            message.clone().unwrap_or_else(|| ffi_err.to_string()),
        ),
        other => (-1, other.to_string()),
    }
}

pub(crate) fn prepare_err(e: rusqlite::Error) -> Error {
    let (code, message) = sqlite_code(&e);
    Error::Prepare { code, message }
}

pub(crate) fn bind_err(e: rusqlite::Error) -> Error {
    let (code, message) = sqlite_code(&e);
    Error::Bind { code, message }
}

pub(crate) fn step_err(e: rusqlite::Error) -> Error {
    let (code, message) = sqlite_code(&e);
    Error::Step { code, message }
}

pub(crate) fn exec_err(e: rusqlite::Error) -> Error {
    let (code, message) = sqlite_code(&e);
    Error::Exec { code, message }
}
