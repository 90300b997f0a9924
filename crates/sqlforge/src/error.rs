//! Error types for sqlforge

use thiserror::Error;

/// Result type alias for sqlforge operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement compilation and entity mapping.
///
/// Only [`OrmError::OptimisticLock`] is an expected, designed-for condition: the
/// caller should reload the entity and retry, or report the conflict. Every other
/// variant signals either a usage error or a genuine absence.
#[derive(Debug, Error)]
pub enum OrmError {
    /// A template references a parameter that was never registered.
    #[error("Unknown parameter '{name}' at position {offset}")]
    UnknownParameter { name: String, offset: usize },

    /// A parameter was registered under a malformed name.
    #[error(
        "'{0}' is not a valid parameter name. Names must start with a letter, and contain only letters, numbers, and underscores."
    )]
    InvalidParameterName(String),

    /// No row with the given id.
    #[error("Could not find row in table {table} with id {id}")]
    NotFound { table: String, id: String },

    /// A query expected to return one row returned none.
    #[error("Expected single result, found zero rows for this query: {0}")]
    NotFoundQuery(String),

    /// A query expected to return one row returned several.
    #[error("Expected {expected} row, got {got}")]
    TooManyRows { expected: usize, got: usize },

    /// The row exists but its version no longer matches the entity's.
    #[error("Could not update row in table {table} with id {id}")]
    OptimisticLock { table: String, id: String },

    /// Insert or update attempted on an entity whose id is null or zero.
    #[error("Tried to write entity to table {table} with null or zero primary key")]
    MissingPrimaryKey { table: String },

    /// A write through a dotted field path hit an absent intermediate object.
    #[error("Null value for {segment} while accessing {path}")]
    BrokenFieldPath { path: String, segment: String },

    /// The mapping does not describe the table correctly (e.g. non-unique id column).
    #[error("Mapping configuration error: {0}")]
    MappingConfiguration(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A field value could not be converted to its storage form.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// A builder method was called in a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error for a table/id pair
    pub fn not_found(table: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            table: table.into(),
            id: id.to_string(),
        }
    }

    /// Create an optimistic lock error for a table/id pair
    pub fn optimistic_lock(table: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::OptimisticLock {
            table: table.into(),
            id: id.to_string(),
        }
    }

    /// Create a too-many-rows error
    pub fn too_many_rows(expected: usize, got: usize) -> Self {
        Self::TooManyRows { expected, got }
    }

    /// Create a conversion error
    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }

    /// Check if this is a not found error (by id or by query)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotFoundQuery(_))
    }

    /// Check if this is an optimistic lock conflict
    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, Self::OptimisticLock { .. })
    }

    /// Whether retrying with freshly loaded data can succeed.
    pub fn is_retryable(&self) -> bool {
        self.is_optimistic_lock()
    }

    /// Parse a tokio_postgres error into a more specific OrmError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return Self::Connection(err.to_string());
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parameter_message_names_offset() {
        let err = OrmError::UnknownParameter {
            name: "name".into(),
            offset: 36,
        };
        assert_eq!(err.to_string(), "Unknown parameter 'name' at position 36");
    }

    #[test]
    fn only_optimistic_lock_is_retryable() {
        assert!(OrmError::optimistic_lock("Employee", 1).is_retryable());
        assert!(!OrmError::not_found("Employee", 1).is_retryable());
        assert!(!OrmError::MissingPrimaryKey { table: "Employee".into() }.is_retryable());
    }

    #[test]
    fn not_found_covers_both_forms() {
        assert!(OrmError::not_found("Employee", 42).is_not_found());
        assert!(OrmError::NotFoundQuery("select 1".into()).is_not_found());
        assert!(!OrmError::too_many_rows(1, 2).is_not_found());
    }
}
