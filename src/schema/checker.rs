//! Per-value type checking against a declared field type

use super::types::FieldType;
use crate::value::Value;

/// Stateless type checker.
pub struct TypeChecker;

impl TypeChecker {
    /// Returns whether `value` satisfies `field_type`.
    ///
    /// Booleans and non-finite floats never satisfy `Number`. Null handling belongs to the
    /// `notnull` constraint, so `Null` only satisfies `Any` here.
    pub fn check_type(value: &Value, field_type: FieldType) -> bool {
        match field_type {
            FieldType::Number => matches!(value, Value::Number(n) if n.is_finite()),
            FieldType::Text => matches!(value, Value::Text(_)),
            FieldType::Boolean => matches!(value, Value::Boolean(_)),
            FieldType::Sequence => matches!(value, Value::Sequence(_)),
            FieldType::Mapping => matches!(value, Value::Mapping(_)),
            FieldType::Any => true,
        }
    }
}
