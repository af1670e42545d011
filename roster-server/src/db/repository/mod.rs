//! Repository Module
//!
//! Per-entity CRUD and query functions over SQLite.
//!
//! Every function takes a `&mut SqliteConnection` so callers decide the
//! transaction boundary: the scheduling core runs its whole
//! read-validate-write sequence on one transaction, handlers that only
//! read acquire a plain pool connection.

pub mod cafe;
pub mod reservation;
pub mod shift;
pub mod staff;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map an insert error, turning unique-constraint violations into
/// [`RepoError::Duplicate`] with a readable message.
pub(crate) fn map_insert_err(err: sqlx::Error, what: &str) -> RepoError {
    match &err {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            RepoError::Duplicate(format!("{what} already exists"))
        }
        _ => RepoError::from(err),
    }
}
