//! Error types for mysqldb

use thiserror::Error;

/// Result type alias for mysqldb operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// Cannot establish the connection, or it has been lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// A rendered statement failed at the server
    #[error("Execution error: {0}")]
    Execution(String),

    /// Unsupported option value or a missing required option
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Schema introspection found no matching table or column
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation (only surfaces with `InsertMode::Strict`)
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Cell decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DbError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a duplicate key error
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }

    /// Classify a sqlx error into a more specific DbError
    #[cfg(feature = "mysql")]
    pub fn from_sqlx_error(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    Self::DuplicateKey(db_err.message().to_string())
                } else {
                    Self::Execution(db_err.message().to_string())
                }
            }
            sqlx::Error::Io(e) => Self::Connection(e.to_string()),
            sqlx::Error::Tls(e) => Self::Connection(e.to_string()),
            sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
                Self::Connection(err.to_string())
            }
            sqlx::Error::Configuration(e) => Self::InvalidArgument(e.to_string()),
            sqlx::Error::ColumnDecode { index, source } => Self::decode(index, source.to_string()),
            other => Self::Execution(other.to_string()),
        }
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_sqlx_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_variants() {
        assert!(DbError::not_found("x").is_not_found());
        assert!(DbError::invalid_argument("x").is_invalid_argument());
        assert!(DbError::connection("x").is_connection());
        assert!(!DbError::execution("x").is_not_found());
    }

    #[test]
    fn display_includes_kind() {
        let err = DbError::decode("Name", "expected text");
        assert_eq!(
            err.to_string(),
            "Decode error on column 'Name': expected text"
        );
        assert_eq!(
            DbError::invalid_argument("unknown join kind 'outer'").to_string(),
            "Invalid argument: unknown join kind 'outer'"
        );
    }
}
