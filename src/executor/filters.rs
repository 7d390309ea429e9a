//! Where-clause matching
//!
//! A where clause is a flat conjunction of field equalities. No type
//! coercion, no expressions, exact match only: `"1"` never equals `1`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::{DbError, DbResult};
use crate::storage::Table;
use crate::value::{Record, Value};

/// Equality conjunction: field name to expected value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WhereClause {
    conditions: BTreeMap<String, Value>,
}

impl WhereClause {
    /// Creates an empty clause, which matches every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition, builder style
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    /// Builds a clause from a JSON object. Returns `None` for non-objects.
    pub fn from_json(json: &serde_json::Value) -> Option<Self> {
        crate::value::record_from_json(json).map(|conditions| Self { conditions })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Iterates conditions in field order
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Record> for WhereClause {
    fn from(conditions: Record) -> Self {
        Self { conditions }
    }
}

/// Evaluates where clauses against records
pub struct RecordMatcher;

impl RecordMatcher {
    /// Checks if a record satisfies every condition (AND semantics).
    ///
    /// A condition on a field the record lacks never matches.
    pub fn matches(record: &Record, where_clause: &WhereClause) -> bool {
        where_clause
            .conditions()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }

    /// Selects the records of `table` matching `where_clause`, with their
    /// positions, in table order.
    ///
    /// A missing or empty clause selects every record. Otherwise:
    /// - a field that is not declared (schema-backed) or present on no
    ///   record (schema-less) fails with `UnknownField`
    /// - a clause matching zero records fails with `NoMatch`
    pub fn evaluate_where<'t>(
        name: &str,
        table: &'t Table,
        where_clause: Option<&WhereClause>,
    ) -> DbResult<Vec<(usize, &'t Record)>> {
        let where_clause = match where_clause {
            Some(clause) if !clause.is_empty() => clause,
            _ => return Ok(table.records().iter().enumerate().collect()),
        };

        for (field, _) in where_clause.conditions() {
            let applicable = match table.schema() {
                Some(schema) => schema.contains(field),
                None => table.records().iter().any(|r| r.contains_key(field)),
            };
            if !applicable {
                return Err(DbError::unknown_field(name, field));
            }
        }

        let matched: Vec<(usize, &Record)> = table
            .records()
            .iter()
            .enumerate()
            .filter(|(_, record)| Self::matches(record, where_clause))
            .collect();

        if matched.is_empty() {
            return Err(DbError::NoMatch(name.to_string()));
        }

        Ok(matched)
    }

    /// Like [`evaluate_where`](Self::evaluate_where) for operations whose
    /// clause is mandatory: a clause without conditions fails with
    /// `EmptyWhere` instead of selecting the whole table.
    pub fn evaluate_required<'t>(
        name: &str,
        table: &'t Table,
        where_clause: &WhereClause,
    ) -> DbResult<Vec<(usize, &'t Record)>> {
        if where_clause.is_empty() {
            return Err(DbError::EmptyWhere(name.to_string()));
        }
        Self::evaluate_where(name, table, Some(where_clause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldConstraint, FieldType, Schema};
    use crate::value::record_from_json;
    use serde_json::json;

    fn record(json: serde_json::Value) -> Record {
        record_from_json(&json).unwrap()
    }

    fn schemaless(records: Vec<Record>) -> Table {
        Table::with_records(None, records)
    }

    #[test]
    fn test_equality_match() {
        let doc = record(json!({"name": "Alice", "age": 30}));
        assert!(RecordMatcher::matches(&doc, &WhereClause::new().equals("name", "Alice")));
        assert!(!RecordMatcher::matches(&doc, &WhereClause::new().equals("name", "Bob")));
    }

    #[test]
    fn test_no_type_coercion() {
        let doc = record(json!({"value": 123, "flag": true}));
        assert!(!RecordMatcher::matches(&doc, &WhereClause::new().equals("value", "123")));
        assert!(RecordMatcher::matches(&doc, &WhereClause::new().equals("value", 123)));
        assert!(!RecordMatcher::matches(&doc, &WhereClause::new().equals("flag", 1)));
    }

    #[test]
    fn test_multiple_conditions_and() {
        let doc = record(json!({"age": 25, "active": true}));
        let both = WhereClause::new().equals("age", 25).equals("active", true);
        assert!(RecordMatcher::matches(&doc, &both));

        let one_wrong = WhereClause::new().equals("age", 25).equals("active", false);
        assert!(!RecordMatcher::matches(&doc, &one_wrong));
    }

    #[test]
    fn test_missing_field_no_match() {
        let doc = record(json!({"name": "Alice"}));
        assert!(!RecordMatcher::matches(&doc, &WhereClause::new().equals("age", 30)));
    }

    #[test]
    fn test_nested_values_compare_structurally() {
        let doc = record(json!({"tags": ["a", 1], "meta": {"k": "v"}}));
        let clause = WhereClause::from_json(&json!({"tags": ["a", 1], "meta": {"k": "v"}})).unwrap();
        assert!(RecordMatcher::matches(&doc, &clause));
    }

    #[test]
    fn test_evaluate_without_clause_selects_all() {
        let table = schemaless(vec![record(json!({"a": 1})), record(json!({"b": 2}))]);
        assert_eq!(RecordMatcher::evaluate_where("t", &table, None).unwrap().len(), 2);
        assert_eq!(
            RecordMatcher::evaluate_where("t", &table, Some(&WhereClause::new()))
                .unwrap()
                .len(),
            2
        );

        let empty = schemaless(vec![]);
        assert!(RecordMatcher::evaluate_where("t", &empty, None).unwrap().is_empty());
    }

    #[test]
    fn test_evaluate_returns_positions_in_order() {
        let table = schemaless(vec![
            record(json!({"k": 1})),
            record(json!({"k": 2})),
            record(json!({"k": 1})),
        ]);
        let matched = RecordMatcher::evaluate_where("t", &table, Some(&WhereClause::new().equals("k", 1)))
            .unwrap();
        let positions: Vec<usize> = matched.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_evaluate_zero_matches_fails() {
        let table = schemaless(vec![record(json!({"k": "1"}))]);
        let err = RecordMatcher::evaluate_where("t", &table, Some(&WhereClause::new().equals("k", "3")))
            .unwrap_err();
        assert_eq!(err, DbError::NoMatch("t".into()));
    }

    #[test]
    fn test_evaluate_unknown_schemaless_field_fails() {
        let table = schemaless(vec![record(json!({"k": "1"}))]);
        let err = RecordMatcher::evaluate_where("t", &table, Some(&WhereClause::new().equals("x", "1")))
            .unwrap_err();
        assert_eq!(err.code(), "SHELF_UNKNOWN_FIELD");
    }

    #[test]
    fn test_evaluate_undeclared_schema_field_fails() {
        let schema = Schema::new()
            .with_field("k", FieldConstraint::optional(FieldType::Text))
            .with_identity();
        let table = Table::with_records(
            Some(schema),
            vec![record(json!({"__ID": "1", "k": "a"}))],
        );

        let err = RecordMatcher::evaluate_where("t", &table, Some(&WhereClause::new().equals("x", "a")))
            .unwrap_err();
        assert_eq!(err.code(), "SHELF_UNKNOWN_FIELD");

        // Declared but unmatched is a different failure
        let err = RecordMatcher::evaluate_where("t", &table, Some(&WhereClause::new().equals("k", "b")))
            .unwrap_err();
        assert_eq!(err.code(), "SHELF_NO_MATCH");
    }

    #[test]
    fn test_required_clause_rejects_empty() {
        let empty = schemaless(vec![]);
        let err = RecordMatcher::evaluate_required("t", &empty, &WhereClause::new()).unwrap_err();
        assert_eq!(err, DbError::EmptyWhere("t".into()));

        let table = schemaless(vec![record(json!({"k": 1}))]);
        assert!(RecordMatcher::evaluate_required("t", &table, &WhereClause::new()).is_err());
        assert_eq!(
            RecordMatcher::evaluate_required("t", &table, &WhereClause::new().equals("k", 1))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_where_clause_from_json() {
        let clause = WhereClause::from_json(&json!({"a": 1, "b": "x"})).unwrap();
        assert_eq!(clause.len(), 2);
        assert!(WhereClause::from_json(&json!(1)).is_none());
    }
}
