//! Database error types
//!
//! `Err(DbError)` is the single failure signal of every public operation.
//! Callers that only care about success use `.is_ok()`; the variant and
//! its code are diagnostics.
//!
//! Error codes:
//! - SHELF_TABLE_EXISTS
//! - SHELF_TABLE_NOT_FOUND
//! - SHELF_UNKNOWN_FIELD
//! - SHELF_NO_MATCH
//! - SHELF_EMPTY_WHERE
//! - SHELF_NON_FINITE_NUMBER
//! - SHELF_INVALID_SNAPSHOT
//! - SHELF_SNAPSHOT_IO
//! - schema codes, see [`SchemaErrorCode`](crate::schema::SchemaErrorCode)

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Database errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    /// Table name, schema, or record failed validation
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// `create_table` on a name already in use
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Operation on a table that does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Where clause names a field the table can never satisfy
    #[error("Unknown field '{field}' in where clause for table '{table}'")]
    UnknownField { table: String, field: String },

    /// Where clause is well formed but matched no record
    #[error("No records in table '{0}' match the where clause")]
    NoMatch(String),

    /// `update` or `delete` called with a clause that has no conditions
    #[error("Where clause for table '{0}' has no conditions")]
    EmptyWhere(String),

    /// NaN or an infinity supplied as a field value
    #[error("Field '{field}' in table '{table}' holds a non-finite number")]
    NonFiniteNumber { table: String, field: String },

    /// Snapshot violates a table or record invariant
    #[error("Invalid snapshot for table '{table}': {reason}")]
    InvalidSnapshot { table: String, reason: String },

    /// Snapshot could not be read, written, or parsed
    #[error("Snapshot I/O failed: {0}")]
    SnapshotIo(String),
}

impl DbError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            DbError::Schema(err) => err.code().code(),
            DbError::TableExists(_) => "SHELF_TABLE_EXISTS",
            DbError::TableNotFound(_) => "SHELF_TABLE_NOT_FOUND",
            DbError::UnknownField { .. } => "SHELF_UNKNOWN_FIELD",
            DbError::NoMatch(_) => "SHELF_NO_MATCH",
            DbError::EmptyWhere(_) => "SHELF_EMPTY_WHERE",
            DbError::NonFiniteNumber { .. } => "SHELF_NON_FINITE_NUMBER",
            DbError::InvalidSnapshot { .. } => "SHELF_INVALID_SNAPSHOT",
            DbError::SnapshotIo(_) => "SHELF_SNAPSHOT_IO",
        }
    }

    pub(crate) fn unknown_field(table: &str, field: &str) -> Self {
        DbError::UnknownField {
            table: table.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn non_finite_number(table: &str, field: &str) -> Self {
        DbError::NonFiniteNumber {
            table: table.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid_snapshot(table: &str, reason: impl Into<String>) -> Self {
        DbError::InvalidSnapshot {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationDetails;

    #[test]
    fn test_codes() {
        assert_eq!(DbError::TableExists("t".into()).code(), "SHELF_TABLE_EXISTS");
        assert_eq!(DbError::TableNotFound("t".into()).code(), "SHELF_TABLE_NOT_FOUND");
        assert_eq!(DbError::unknown_field("t", "f").code(), "SHELF_UNKNOWN_FIELD");
        assert_eq!(DbError::NoMatch("t".into()).code(), "SHELF_NO_MATCH");
        assert_eq!(DbError::EmptyWhere("t".into()).code(), "SHELF_EMPTY_WHERE");
        assert_eq!(DbError::non_finite_number("t", "n").code(), "SHELF_NON_FINITE_NUMBER");
        assert_eq!(DbError::invalid_snapshot("t", "x").code(), "SHELF_INVALID_SNAPSHOT");
    }

    #[test]
    fn test_schema_errors_keep_their_code() {
        let err: DbError =
            SchemaError::validation_failed("t", ValidationDetails::missing_field("n")).into();
        assert_eq!(err.code(), "SHELF_SCHEMA_VALIDATION_FAILED");
        assert!(err.to_string().contains("'n'"));
    }

    #[test]
    fn test_display() {
        let err = DbError::unknown_field("users", "email");
        assert_eq!(
            err.to_string(),
            "Unknown field 'email' in where clause for table 'users'"
        );
    }
}
