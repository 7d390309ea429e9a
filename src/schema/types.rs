//! Schema type definitions
//!
//! Supported type tags:
//! - number: integer or float (never boolean)
//! - text: UTF-8 string
//! - boolean: strict boolean
//! - sequence (alias `list`): ordered, heterogeneous sequence
//! - mapping (alias `dict`): nested key-value mapping
//! - any: every value

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use crate::value::{Record, Value};

/// Reserved identity field injected into every schema-backed table
pub const ID_FIELD: &str = "__ID";

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Text,
    Boolean,
    #[serde(alias = "list")]
    Sequence,
    #[serde(alias = "dict")]
    Mapping,
    Any,
}

impl FieldType {
    /// Parses a type tag, accepting the `list`/`dict` aliases
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "number" => Some(FieldType::Number),
            "text" => Some(FieldType::Text),
            "boolean" => Some(FieldType::Boolean),
            "sequence" | "list" => Some(FieldType::Sequence),
            "mapping" | "dict" => Some(FieldType::Mapping),
            "any" => Some(FieldType::Any),
            _ => None,
        }
    }

    /// Returns the canonical type tag
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Sequence => "sequence",
            FieldType::Mapping => "mapping",
            FieldType::Any => "any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Constraint attached to one schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConstraint {
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Value must be distinct across the table
    #[serde(default)]
    pub unique: bool,
    /// Value must be present and non-null
    #[serde(default)]
    pub notnull: bool,
}

impl FieldConstraint {
    pub fn new(field_type: FieldType, unique: bool, notnull: bool) -> Self {
        Self {
            field_type,
            unique,
            notnull,
        }
    }

    /// Nullable, non-unique field
    pub fn optional(field_type: FieldType) -> Self {
        Self::new(field_type, false, false)
    }

    /// Non-null, non-unique field
    pub fn required(field_type: FieldType) -> Self {
        Self::new(field_type, false, true)
    }

    /// Non-null, unique field
    pub fn unique(field_type: FieldType) -> Self {
        Self::new(field_type, true, true)
    }

    /// Constraint of the engine-owned `__ID` field
    pub fn identity() -> Self {
        Self::unique(FieldType::Text)
    }

    /// Parses one field constraint from its JSON definition.
    ///
    /// `type` is required. `unique` and `notnull` default to `false` and,
    /// when present, must be JSON booleans: `"false"` or `0` are rejected.
    pub fn from_json(field: &str, json: &JsonValue) -> SchemaResult<Self> {
        let obj = json.as_object().ok_or_else(|| {
            SchemaError::invalid_schema(ValidationDetails::type_mismatch(
                field,
                "constraint object",
                json_type_name(json),
            ))
        })?;

        for key in obj.keys() {
            if !matches!(key.as_str(), "type" | "unique" | "notnull") {
                return Err(SchemaError::invalid_schema(ValidationDetails::extra_field(
                    format!("{}.{}", field, key),
                )));
            }
        }

        let tag = obj.get("type").ok_or_else(|| {
            SchemaError::invalid_schema(ValidationDetails::missing_field(format!("{}.type", field)))
        })?;
        let field_type = tag.as_str().and_then(FieldType::from_tag).ok_or_else(|| {
            SchemaError::invalid_schema(ValidationDetails::new(
                format!("{}.type", field),
                "one of number, text, boolean, sequence, mapping, any",
                tag.to_string(),
            ))
        })?;

        let unique = literal_bool(field, "unique", obj.get("unique"))?;
        let notnull = literal_bool(field, "notnull", obj.get("notnull"))?;

        Ok(Self::new(field_type, unique, notnull))
    }
}

fn literal_bool(field: &str, flag: &str, value: Option<&JsonValue>) -> SchemaResult<bool> {
    match value {
        None => Ok(false),
        Some(JsonValue::Bool(b)) => Ok(*b),
        Some(other) => Err(SchemaError::invalid_schema(ValidationDetails::type_mismatch(
            format!("{}.{}", field, flag),
            "boolean",
            json_type_name(other),
        ))),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "text",
        JsonValue::Array(_) => "sequence",
        JsonValue::Object(_) => "mapping",
    }
}

/// Table schema: field name to constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldConstraint>,
}

impl Schema {
    /// Creates an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style
    pub fn with_field(mut self, name: impl Into<String>, constraint: FieldConstraint) -> Self {
        self.fields.insert(name.into(), constraint);
        self
    }

    /// Parses a schema definition from JSON.
    ///
    /// The definition must be an object mapping field names to constraint
    /// objects. See [`FieldConstraint::from_json`].
    pub fn from_json(json: &JsonValue) -> SchemaResult<Self> {
        let obj = json.as_object().ok_or_else(|| {
            SchemaError::invalid_schema(ValidationDetails::type_mismatch(
                "$root",
                "mapping of field definitions",
                json_type_name(json),
            ))
        })?;

        let mut fields = BTreeMap::new();
        for (name, definition) in obj {
            fields.insert(name.clone(), FieldConstraint::from_json(name, definition)?);
        }
        Ok(Self { fields })
    }

    pub fn insert(&mut self, name: impl Into<String>, constraint: FieldConstraint) {
        self.fields.insert(name.into(), constraint);
    }

    pub fn get(&self, field: &str) -> Option<&FieldConstraint> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates fields in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldConstraint)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a copy with the `__ID` constraint injected
    pub fn with_identity(&self) -> Self {
        let mut augmented = self.clone();
        augmented.insert(ID_FIELD, FieldConstraint::identity());
        augmented
    }

    /// Fills every declared field missing from `record` with `Null`.
    ///
    /// Undeclared fields are kept; rejecting them is the validator's job.
    pub fn complete(&self, mut record: Record) -> Record {
        for name in self.fields.keys() {
            record.entry(name.clone()).or_insert(Value::Null);
        }
        record
    }
}
