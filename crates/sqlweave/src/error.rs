//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for sqlweave operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// Statement has no target table
    #[error("table not specified")]
    TableNotSpecified,

    /// Statement has no columns to write
    #[error("column not specified")]
    ColumnNotSpecified,

    /// INSERT has columns but no value rows
    #[error("values not specified")]
    ValuesNotSpecified,

    /// INSERT value row width differs from the column list
    #[error("value count mismatch: expected {expected} values, got {got}")]
    ValueCountMismatch { expected: usize, got: usize },

    /// Placeholder markers and bound values are out of step
    #[error("wrong placeholder count: {markers} placeholders for {values} values")]
    PlaceholderCount { markers: usize, values: usize },

    /// Dialect name not present in the registry
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Driver error reported by a non-postgres runner
    #[error("Driver error: {0}")]
    Driver(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Query exceeded its timeout or deadline
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Query was cancelled through its context
    #[error("Query cancelled")]
    Cancelled,
}

impl SqlError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a driver error from any displayable driver failure
    pub fn driver(err: impl std::fmt::Display) -> Self {
        Self::Driver(err.to_string())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this is a cancellation error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error was raised while validating a statement, before any SQL ran
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::TableNotSpecified
                | Self::ColumnNotSpecified
                | Self::ValuesNotSpecified
                | Self::ValueCountMismatch { .. }
        )
    }

    /// Parse a tokio_postgres error into a more specific SqlError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_kinds() {
        assert!(SqlError::TableNotSpecified.is_construction());
        assert!(SqlError::ValueCountMismatch { expected: 2, got: 1 }.is_construction());
        assert!(!SqlError::not_found("x").is_construction());
        assert!(SqlError::not_found("x").is_not_found());
    }

    #[test]
    fn test_display() {
        let err = SqlError::PlaceholderCount {
            markers: 2,
            values: 1,
        };
        assert_eq!(
            err.to_string(),
            "wrong placeholder count: 2 placeholders for 1 values"
        );
        assert_eq!(SqlError::TableNotSpecified.to_string(), "table not specified");
    }
}
