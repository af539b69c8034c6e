use deadpool_postgres::{BuildError, PoolError};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

// StoreError is the lowest level error type, wrapping errors from the credential store. It does not
// wrap any higher level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation (username or email already taken)
    #[error("unique violation: {0}")]
    Duplicate(&'static str),

    /// Store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Pg(#[from] tokio_postgres::Error),

    #[error(transparent)]
    Migrate(#[from] refinery::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("row decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// Map a postgres error onto `Duplicate` when it is a unique-constraint violation.
    pub fn from_pg(e: tokio_postgres::Error) -> Self {
        use tokio_postgres::error::SqlState;

        let Some(db) = e.as_db_error() else {
            return StoreError::Pg(e);
        };
        if db.code() != &SqlState::UNIQUE_VIOLATION {
            return StoreError::Pg(e);
        }
        match db.constraint() {
            Some(c) if c.contains("email") => StoreError::Duplicate("email"),
            _ => StoreError::Duplicate("username"),
        }
    }
}
