//! Error types for the database layer

use thiserror::Error;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}
