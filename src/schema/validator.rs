//! Schema validator
//!
//! Definition checks (table creation):
//! - Table name is a non-empty string
//! - Field names are non-empty
//! - `__ID` is never declared by the caller
//!
//! Record checks (insert and update):
//! - No undeclared fields exist
//! - Non-null values match their declared type exactly
//! - `notnull` fields are present and non-null
//! - `unique` fields do not repeat another record's non-null value
//!
//! The validator never mutates; callers apply changes only after it
//! returns `Ok`.

use super::checker::TypeChecker;
use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{Schema, ID_FIELD};
use crate::value::{Record, Value};

/// Validates table definitions and candidate records.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates a table name.
    pub fn validate_table_name(name: &str) -> SchemaResult<()> {
        if name.is_empty() {
            return Err(SchemaError::invalid_table_name(name));
        }
        Ok(())
    }

    /// Validates a table definition and returns the schema to register.
    ///
    /// A missing schema is valid and yields a schema-less table. A present
    /// schema is returned with the `__ID` constraint injected.
    pub fn validate_definition(name: &str, schema: Option<&Schema>) -> SchemaResult<Option<Schema>> {
        Self::validate_table_name(name)?;

        let Some(schema) = schema else {
            return Ok(None);
        };

        for (field, _) in schema.fields() {
            if field.is_empty() {
                return Err(SchemaError::invalid_schema(ValidationDetails::new(
                    "$field",
                    "non-empty field name",
                    "empty string",
                ))
                .for_table(name));
            }
            if field == ID_FIELD {
                return Err(SchemaError::reserved_field(name, ID_FIELD));
            }
        }

        Ok(Some(schema.with_identity()))
    }

    /// Validates a complete candidate record against `schema`.
    ///
    /// `others` holds every record the candidate must not collide with on
    /// unique fields. For updates the record being replaced is excluded.
    pub fn validate_record(
        table: &str,
        schema: &Schema,
        record: &Record,
        others: &[&Record],
    ) -> SchemaResult<()> {
        for key in record.keys() {
            if !schema.contains(key) {
                return Err(SchemaError::validation_failed(
                    table,
                    ValidationDetails::extra_field(key),
                ));
            }
        }

        for (field, constraint) in schema.fields() {
            let value = match record.get(field) {
                Some(value) => value,
                None if constraint.notnull => {
                    return Err(SchemaError::validation_failed(
                        table,
                        ValidationDetails::missing_field(field),
                    ));
                }
                None => continue,
            };

            if value.is_null() {
                if constraint.notnull {
                    return Err(SchemaError::validation_failed(
                        table,
                        ValidationDetails::null_value(field),
                    ));
                }
                continue;
            }

            if !TypeChecker::check_type(value, constraint.field_type) {
                return Err(SchemaError::validation_failed(
                    table,
                    ValidationDetails::type_mismatch(
                        field,
                        constraint.field_type.type_name(),
                        value.type_name(),
                    ),
                ));
            }

            if constraint.unique && Self::collides(field, value, others) {
                return Err(SchemaError::unique_violation(
                    table,
                    ValidationDetails::duplicate_value(field, value.to_string()),
                ));
            }
        }

        Ok(())
    }

    fn collides(field: &str, value: &Value, others: &[&Record]) -> bool {
        others
            .iter()
            .any(|other| other.get(field).map_or(false, |existing| existing == value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{FieldConstraint, FieldType};
    use crate::value::record_from_json;
    use serde_json::json;

    fn users() -> Schema {
        Schema::new()
            .with_field("name", FieldConstraint::unique(FieldType::Text))
            .with_field("age", FieldConstraint::optional(FieldType::Number))
            .with_field("active", FieldConstraint::required(FieldType::Boolean))
            .with_identity()
    }

    fn record(json: serde_json::Value) -> Record {
        record_from_json(&json).unwrap()
    }

    #[test]
    fn test_empty_table_name_rejected() {
        let err = SchemaValidator::validate_table_name("").unwrap_err();
        assert_eq!(err.code().code(), "SHELF_INVALID_TABLE_NAME");
        assert!(SchemaValidator::validate_table_name("t").is_ok());
    }

    #[test]
    fn test_definition_without_schema() {
        assert_eq!(SchemaValidator::validate_definition("t", None).unwrap(), None);
        assert!(SchemaValidator::validate_definition("", None).is_err());
    }

    #[test]
    fn test_definition_injects_identity_once() {
        let schema = Schema::new().with_field("a", FieldConstraint::optional(FieldType::Any));
        let registered = SchemaValidator::validate_definition("t", Some(&schema))
            .unwrap()
            .unwrap();
        assert_eq!(registered.len(), 2);
        assert_eq!(registered.get(ID_FIELD), Some(&FieldConstraint::identity()));
    }

    #[test]
    fn test_definition_rejects_declared_identity() {
        let schema = Schema::new().with_field(ID_FIELD, FieldConstraint::identity());
        let err = SchemaValidator::validate_definition("t", Some(&schema)).unwrap_err();
        assert_eq!(err.code().code(), "SHELF_RESERVED_FIELD");
    }

    #[test]
    fn test_definition_rejects_empty_field_name() {
        let schema = Schema::new().with_field("", FieldConstraint::optional(FieldType::Any));
        assert!(SchemaValidator::validate_definition("t", Some(&schema)).is_err());
    }

    #[test]
    fn test_valid_record_passes() {
        let candidate = record(json!({"__ID": "1", "name": "Alice", "age": 30, "active": true}));
        assert!(SchemaValidator::validate_record("users", &users(), &candidate, &[]).is_ok());
    }

    #[test]
    fn test_optional_field_may_be_null() {
        let candidate = record(json!({"__ID": "1", "name": "Alice", "age": null, "active": true}));
        assert!(SchemaValidator::validate_record("users", &users(), &candidate, &[]).is_ok());
    }

    #[test]
    fn test_extra_field_fails() {
        let candidate = record(json!({"__ID": "1", "name": "A", "active": true, "x": 1}));
        let err = SchemaValidator::validate_record("users", &users(), &candidate, &[]).unwrap_err();
        assert_eq!(err.details().unwrap().field, "x");
    }

    #[test]
    fn test_missing_required_field_fails() {
        let candidate = record(json!({"__ID": "1", "name": "A"}));
        let err = SchemaValidator::validate_record("users", &users(), &candidate, &[]).unwrap_err();
        assert_eq!(err.details().unwrap().field, "active");
    }

    #[test]
    fn test_null_required_field_fails() {
        let candidate = record(json!({"__ID": "1", "name": "A", "active": null}));
        let err = SchemaValidator::validate_record("users", &users(), &candidate, &[]).unwrap_err();
        assert_eq!(err.details().unwrap().actual, "null");
    }

    #[test]
    fn test_type_mismatch_fails() {
        let candidate = record(json!({"__ID": "1", "name": "A", "age": "30", "active": true}));
        let err = SchemaValidator::validate_record("users", &users(), &candidate, &[]).unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details.field, "age");
        assert_eq!(details.expected, "number");
        assert_eq!(details.actual, "text");
    }

    #[test]
    fn test_unique_collision_fails() {
        let existing = record(json!({"__ID": "1", "name": "A", "active": true}));
        let candidate = record(json!({"__ID": "2", "name": "A", "active": false}));
        let err = SchemaValidator::validate_record("users", &users(), &candidate, &[&existing])
            .unwrap_err();
        assert_eq!(err.code().code(), "SHELF_UNIQUE_VIOLATION");
    }

    #[test]
    fn test_nulls_never_collide() {
        let schema = Schema::new()
            .with_field("email", FieldConstraint::new(FieldType::Text, true, false))
            .with_identity();
        let existing = record(json!({"__ID": "1", "email": null}));
        let candidate = record(json!({"__ID": "2", "email": null}));
        assert!(SchemaValidator::validate_record("t", &schema, &candidate, &[&existing]).is_ok());
    }
}
