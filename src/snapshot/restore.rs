//! Snapshot export and validated restore

use super::format::{DatabaseSnapshot, TableSnapshot, SNAPSHOT_FORMAT_VERSION};
use crate::config::DatabaseConfig;
use crate::executor::{check_finite, Database, DbError, DbResult};
use crate::observability::Event;
use crate::schema::{FieldConstraint, SchemaValidator, ID_FIELD};
use crate::storage::{Table, TableStore};
use crate::value::Record;

impl Database {
    /// Exports every table
    pub fn snapshot(&self) -> DatabaseSnapshot {
        let mut snapshot = DatabaseSnapshot::default();
        for (name, table) in self.store().tables() {
            snapshot.tables.insert(
                name.to_string(),
                TableSnapshot {
                    schema: table.schema().cloned(),
                    records: table.records().to_vec(),
                },
            );
        }

        self.logger().info(
            Event::SnapshotExported,
            &[("tables", &snapshot.tables.len().to_string())],
        );
        snapshot
    }

    /// Builds a database from a snapshot.
    ///
    /// Every table must satisfy the invariants an engine-built table
    /// would: non-empty name, a schema carrying exactly the `__ID`
    /// identity constraint, and records that pass schema validation
    /// (types, notnull, uniqueness, finite numbers). Omitted optional
    /// fields are filled with `Null`.
    pub fn from_snapshot(snapshot: DatabaseSnapshot, config: DatabaseConfig) -> DbResult<Self> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(DbError::invalid_snapshot(
                "*",
                format!(
                    "unsupported format version {} (expected {})",
                    snapshot.format_version, SNAPSHOT_FORMAT_VERSION
                ),
            ));
        }

        let mut store = TableStore::new();
        for (name, table) in snapshot.tables {
            let table = restore_table(&name, table)?;
            store.insert_table(&name, table);
        }

        let db = Database::with_store(store, config);
        db.logger().info(
            Event::SnapshotRestored,
            &[("tables", &db.store().table_count().to_string())],
        );
        Ok(db)
    }
}

fn restore_table(name: &str, snapshot: TableSnapshot) -> DbResult<Table> {
    SchemaValidator::validate_table_name(name)
        .map_err(|e| DbError::invalid_snapshot(name, e.message()))?;
    for record in &snapshot.records {
        check_finite(name, record).map_err(|e| DbError::invalid_snapshot(name, e.to_string()))?;
    }

    let Some(schema) = snapshot.schema else {
        return Ok(Table::with_records(None, snapshot.records));
    };

    if schema.get(ID_FIELD) != Some(&FieldConstraint::identity()) {
        return Err(DbError::invalid_snapshot(
            name,
            format!("schema must declare '{}' as unique, notnull text", ID_FIELD),
        ));
    }
    if schema.fields().any(|(field, _)| field.is_empty()) {
        return Err(DbError::invalid_snapshot(name, "schema declares an empty field name"));
    }

    let mut accepted: Vec<Record> = Vec::with_capacity(snapshot.records.len());
    for record in snapshot.records {
        let record = schema.complete(record);
        let others: Vec<&Record> = accepted.iter().collect();
        SchemaValidator::validate_record(name, &schema, &record, &others)
            .map_err(|e| DbError::invalid_snapshot(name, e.message()))?;
        accepted.push(record);
    }

    Ok(Table::with_records(Some(schema), accepted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::WhereClause;
    use crate::schema::{FieldType, Schema};
    use crate::value::{record_from_json, Value};
    use serde_json::json;

    fn populated() -> Database {
        let mut db = Database::new();
        let schema = Schema::new()
            .with_field("n", FieldConstraint::unique(FieldType::Number))
            .with_field("note", FieldConstraint::optional(FieldType::Text));
        db.create_table("numbers", Some(schema)).unwrap();
        db.create_table("free", None).unwrap();
        for n in 1..=3 {
            db.insert("numbers", record_from_json(&json!({"n": n})).unwrap())
                .unwrap();
        }
        db.insert("free", record_from_json(&json!({"anything": [1, 2]})).unwrap())
            .unwrap();
        db
    }

    #[test]
    fn test_export_restore_preserves_state() {
        let db = populated();
        let restored = Database::from_snapshot(db.snapshot(), DatabaseConfig::default()).unwrap();

        assert_eq!(restored.snapshot(), db.snapshot());
        assert_eq!(restored.schema("numbers").unwrap(), db.schema("numbers").unwrap());
        assert_eq!(restored.schema("free").unwrap(), None);
    }

    #[test]
    fn test_restored_database_enforces_uniqueness() {
        let db = populated();
        let mut restored = Database::from_snapshot(db.snapshot(), DatabaseConfig::default()).unwrap();

        let err = restored
            .insert("numbers", record_from_json(&json!({"n": 2})).unwrap())
            .unwrap_err();
        assert_eq!(err.code(), "SHELF_UNIQUE_VIOLATION");
        assert_eq!(
            restored
                .select("numbers", Some(&WhereClause::new().equals("n", 2)))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_duplicate_unique_values_rejected() {
        let mut snapshot = populated().snapshot();
        let numbers = snapshot.tables.get_mut("numbers").unwrap();
        numbers.records[1].insert("n".into(), Value::from(1));

        let err = Database::from_snapshot(snapshot, DatabaseConfig::default()).unwrap_err();
        assert_eq!(err.code(), "SHELF_INVALID_SNAPSHOT");
    }

    #[test]
    fn test_schema_without_identity_rejected() {
        let mut snapshot = DatabaseSnapshot::default();
        snapshot.tables.insert(
            "t".into(),
            TableSnapshot {
                schema: Some(Schema::new()),
                records: vec![],
            },
        );
        assert!(Database::from_snapshot(snapshot, DatabaseConfig::default()).is_err());
    }

    #[test]
    fn test_empty_table_name_rejected() {
        let mut snapshot = DatabaseSnapshot::default();
        snapshot.tables.insert(String::new(), TableSnapshot::default());
        assert!(Database::from_snapshot(snapshot, DatabaseConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let snapshot = DatabaseSnapshot {
            format_version: 99,
            ..DatabaseSnapshot::default()
        };
        let err = Database::from_snapshot(snapshot, DatabaseConfig::default()).unwrap_err();
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn test_non_finite_number_rejected() {
        let mut snapshot = populated().snapshot();
        let free = snapshot.tables.get_mut("free").unwrap();
        free.records[0].insert("x".into(), Value::from(f64::INFINITY));

        let err = Database::from_snapshot(snapshot, DatabaseConfig::default()).unwrap_err();
        assert_eq!(err.code(), "SHELF_INVALID_SNAPSHOT");
    }

    #[test]
    fn test_missing_optional_fields_are_filled() {
        let mut snapshot = populated().snapshot();
        let numbers = snapshot.tables.get_mut("numbers").unwrap();
        numbers.records[0].remove("note");

        let restored = Database::from_snapshot(snapshot, DatabaseConfig::default()).unwrap();
        let all = restored.select("numbers", None).unwrap();
        assert_eq!(all[0]["note"], Value::Null);
    }
}
