//! Schema error types
//!
//! Error codes:
//! - SHELF_INVALID_TABLE_NAME
//! - SHELF_INVALID_SCHEMA
//! - SHELF_RESERVED_FIELD
//! - SHELF_SCHEMA_VALIDATION_FAILED
//! - SHELF_UNIQUE_VIOLATION
//!
//! Every schema error rejects the operation that raised it. Nothing is
//! mutated before validation completes, so there is no fatal class.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Table name is empty
    ShelfInvalidTableName,
    /// Schema definition is malformed
    ShelfInvalidSchema,
    /// Caller supplied the engine-owned `__ID` field
    ShelfReservedField,
    /// Record violates a field constraint
    ShelfSchemaValidationFailed,
    /// Record repeats another record's value for a unique field
    ShelfUniqueViolation,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::ShelfInvalidTableName => "SHELF_INVALID_TABLE_NAME",
            SchemaErrorCode::ShelfInvalidSchema => "SHELF_INVALID_SCHEMA",
            SchemaErrorCode::ShelfReservedField => "SHELF_RESERVED_FIELD",
            SchemaErrorCode::ShelfSchemaValidationFailed => "SHELF_SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::ShelfUniqueViolation => "SHELF_UNIQUE_VIOLATION",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field name
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn duplicate_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, "a value not used by another record", value)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    table: Option<String>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create an invalid table name error
    pub fn invalid_table_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::ShelfInvalidTableName,
            message: format!("Table name {:?} must be a non-empty string", name),
            table: Some(name),
            details: None,
        }
    }

    /// Create a malformed schema definition error
    pub fn invalid_schema(details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ShelfInvalidSchema,
            message: format!("Malformed schema definition: {}", details),
            table: None,
            details: Some(details),
        }
    }

    /// Create a reserved field error
    pub fn reserved_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::ShelfReservedField,
            message: format!("Field '{}' is managed by the engine", field),
            table: Some(table.into()),
            details: Some(ValidationDetails::new(field, "engine-generated value", "caller value")),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(table: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ShelfSchemaValidationFailed,
            message: format!("Record validation failed: {}", details),
            table: Some(table.into()),
            details: Some(details),
        }
    }

    /// Create a uniqueness violation error
    pub fn unique_violation(table: impl Into<String>, details: ValidationDetails) -> Self {
        Self {
            code: SchemaErrorCode::ShelfUniqueViolation,
            message: format!("Uniqueness violated: {}", details),
            table: Some(table.into()),
            details: Some(details),
        }
    }

    /// Attaches the table this error was raised for
    pub fn for_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table name if applicable
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code.code(), self.message)?;
        if let Some(table) = &self.table {
            write!(f, " (table '{}')", table)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
