//! CRUD engine
//!
//! Every public operation follows the same strict order:
//!
//! 1. Resolve the target table
//! 2. Validate the mutation (schema, types, uniqueness)
//! 3. Select affected records with the where clause
//! 4. Mutate storage, only if every step above succeeded
//! 5. Emit one log event and update counters
//!
//! A failed operation leaves every table exactly as it was.

use std::collections::BTreeSet;

use serde_json::Value as JsonValue;

use super::errors::{DbError, DbResult};
use super::filters::{RecordMatcher, WhereClause};
use super::identity::IdGenerator;
use crate::config::DatabaseConfig;
use crate::observability::{Event, Logger, MetricsRegistry, MetricsSnapshot, Severity};
use crate::schema::{Schema, SchemaError, SchemaValidator, ID_FIELD};
use crate::storage::{Table, TableStore};
use crate::value::{Record, Value};

/// Public operations, for logging and counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    CreateTable,
    Insert,
    Select,
    Update,
    Delete,
    DeleteTable,
}

impl Operation {
    fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateTable => "create_table",
            Operation::Insert => "insert",
            Operation::Select => "select",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::DeleteTable => "delete_table",
        }
    }

    fn event(&self) -> Event {
        match self {
            Operation::CreateTable => Event::TableCreated,
            Operation::Insert => Event::RecordInserted,
            Operation::Select => Event::RecordsSelected,
            Operation::Update => Event::RecordsUpdated,
            Operation::Delete => Event::RecordsDeleted,
            Operation::DeleteTable => Event::TableDropped,
        }
    }

    fn severity(&self) -> Severity {
        if self.event().is_mutation() {
            Severity::Info
        } else {
            Severity::Trace
        }
    }
}

/// An in-process record store.
///
/// Each instance is independent. Mutations take `&mut self`, so sharing
/// one database across threads requires an external lock.
#[derive(Debug)]
pub struct Database {
    store: TableStore,
    ids: IdGenerator,
    logger: Logger,
    metrics: MetricsRegistry,
    config: DatabaseConfig,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty database with the default configuration
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    /// Creates an empty database
    pub fn with_config(config: DatabaseConfig) -> Self {
        Self::with_store(TableStore::new(), config)
    }

    pub(crate) fn with_store(store: TableStore, config: DatabaseConfig) -> Self {
        let mut ids = IdGenerator::new(config.id_strategy);
        for (_, table) in store.tables().filter(|(_, t)| t.schema().is_some()) {
            for id in table.records().iter().filter_map(|r| r.get(ID_FIELD)) {
                if let Some(id) = id.as_text() {
                    ids.resume_after(id);
                }
            }
        }

        let db = Self {
            store,
            ids,
            logger: Logger::new(config.log_level, config.log_sink),
            metrics: MetricsRegistry::new(),
            config,
        };
        db.logger.info(
            Event::DatabaseOpened,
            &[("tables", &db.store.table_count().to_string())],
        );
        db
    }

    // ==================
    // Table lifecycle
    // ==================

    /// Creates a table, optionally schema-backed.
    ///
    /// Returns the registered schema (with `__ID` injected), or `None` for
    /// a schema-less table.
    ///
    /// # Errors
    ///
    /// - Empty name or malformed schema (`Schema`)
    /// - Name already in use (`TableExists`)
    pub fn create_table(&mut self, name: &str, schema: Option<Schema>) -> DbResult<Option<Schema>> {
        let result = self.try_create_table(name, schema);
        self.observe(Operation::CreateTable, name, &result, |_| 0);
        result
    }

    /// Creates a table from a JSON schema definition.
    ///
    /// See [`Schema::from_json`] for the accepted shape.
    pub fn create_table_json(
        &mut self,
        name: &str,
        schema: Option<&JsonValue>,
    ) -> DbResult<Option<Schema>> {
        match schema.map(Schema::from_json).transpose() {
            Ok(schema) => self.create_table(name, schema),
            Err(err) => {
                let result: DbResult<Option<Schema>> = Err(err.for_table(name).into());
                self.observe(Operation::CreateTable, name, &result, |_| 0);
                result
            }
        }
    }

    /// Drops a table and returns its records.
    ///
    /// # Errors
    ///
    /// - Empty name (`Schema`)
    /// - Table does not exist (`TableNotFound`)
    pub fn delete_table(&mut self, name: &str) -> DbResult<Vec<Record>> {
        let result = self.try_delete_table(name);
        self.observe(Operation::DeleteTable, name, &result, Vec::len);
        result
    }

    // ==================
    // Records
    // ==================

    /// Inserts a record and returns it as stored.
    ///
    /// For schema-backed tables the stored record carries every declared
    /// field (omitted ones as `Null`) and a generated `__ID`.
    ///
    /// # Errors
    ///
    /// - Table does not exist (`TableNotFound`)
    /// - NaN or infinite number anywhere in `fields` (`NonFiniteNumber`)
    /// - `__ID` supplied, undeclared field, type mismatch, null or missing
    ///   `notnull` field, repeated `unique` value (`Schema`)
    pub fn insert(&mut self, name: &str, fields: Record) -> DbResult<Record> {
        let result = self.try_insert(name, fields);
        self.observe(Operation::Insert, name, &result, |_| 1);
        result
    }

    /// Returns the whole table when `where_clause` is `None`, otherwise
    /// the matching records in table order.
    ///
    /// # Errors
    ///
    /// - Table does not exist (`TableNotFound`)
    /// - Clause names an inapplicable field (`UnknownField`)
    /// - Clause matches nothing (`NoMatch`)
    pub fn select(&self, name: &str, where_clause: Option<&WhereClause>) -> DbResult<Vec<Record>> {
        let result = self.try_select(name, where_clause);
        self.observe(Operation::Select, name, &result, Vec::len);
        result
    }

    /// Overlays `fields` onto every matching record and returns the
    /// updated records. All matching records change or none do.
    ///
    /// # Errors
    ///
    /// Same as [`select`](Self::select), plus a clause without conditions
    /// (`EmptyWhere`), a non-finite number in `fields` (`NonFiniteNumber`)
    /// and any schema violation by any updated record. Writing `__ID` is
    /// rejected on schema-backed tables.
    pub fn update(
        &mut self,
        name: &str,
        fields: Record,
        where_clause: &WhereClause,
    ) -> DbResult<Vec<Record>> {
        let result = self.try_update(name, fields, where_clause);
        self.observe(Operation::Update, name, &result, Vec::len);
        result
    }

    /// Removes every matching record and returns them. The remaining
    /// records keep their relative order.
    ///
    /// # Errors
    ///
    /// Same as [`select`](Self::select), plus a clause without conditions
    /// (`EmptyWhere`).
    pub fn delete(&mut self, name: &str, where_clause: &WhereClause) -> DbResult<Vec<Record>> {
        let result = self.try_delete(name, where_clause);
        self.observe(Operation::Delete, name, &result, Vec::len);
        result
    }

    // ==================
    // Introspection
    // ==================

    /// Returns the registered schema of a table (`None` if schema-less)
    pub fn schema(&self, name: &str) -> DbResult<Option<&Schema>> {
        self.resolve(name).map(Table::schema)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.store.table_names()
    }

    /// Number of records in a table
    pub fn len(&self, name: &str) -> DbResult<usize> {
        self.resolve(name).map(Table::len)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Log lines captured by the `memory` sink
    pub fn log_lines(&self) -> Vec<String> {
        self.logger.captured()
    }

    pub(crate) fn store(&self) -> &TableStore {
        &self.store
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    // ==================
    // Operation bodies
    // ==================

    fn resolve(&self, name: &str) -> DbResult<&Table> {
        self.store
            .table(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    fn try_create_table(&mut self, name: &str, schema: Option<Schema>) -> DbResult<Option<Schema>> {
        let registered = SchemaValidator::validate_definition(name, schema.as_ref())?;

        if !self.store.create_table(name, registered.clone()) {
            return Err(DbError::TableExists(name.to_string()));
        }
        Ok(registered)
    }

    fn try_delete_table(&mut self, name: &str) -> DbResult<Vec<Record>> {
        SchemaValidator::validate_table_name(name)?;
        self.store
            .drop_table(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    fn try_insert(&mut self, name: &str, fields: Record) -> DbResult<Record> {
        let table = self
            .store
            .table(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))?;
        check_finite(name, &fields)?;

        let record = match table.schema() {
            None => fields,
            Some(schema) => {
                if fields.contains_key(ID_FIELD) {
                    return Err(SchemaError::reserved_field(name, ID_FIELD).into());
                }

                let existing: Vec<&Record> = table.records().iter().collect();
                let id = self.ids.generate(|candidate| {
                    existing
                        .iter()
                        .any(|r| r.get(ID_FIELD).and_then(Value::as_text) == Some(candidate))
                });

                let mut record = schema.complete(fields);
                record.insert(ID_FIELD.to_string(), Value::from(id));
                SchemaValidator::validate_record(name, schema, &record, &existing)?;
                record
            }
        };

        self.store
            .append_record(name, record)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    fn try_select(&self, name: &str, where_clause: Option<&WhereClause>) -> DbResult<Vec<Record>> {
        let table = self.resolve(name)?;
        let matched = RecordMatcher::evaluate_where(name, table, where_clause)?;
        Ok(matched.into_iter().map(|(_, record)| record.clone()).collect())
    }

    fn try_update(
        &mut self,
        name: &str,
        fields: Record,
        where_clause: &WhereClause,
    ) -> DbResult<Vec<Record>> {
        let table = self.resolve(name)?;

        if table.schema().is_some() && fields.contains_key(ID_FIELD) {
            return Err(SchemaError::reserved_field(name, ID_FIELD).into());
        }
        check_finite(name, &fields)?;

        let candidates: Vec<(usize, Record)> =
            RecordMatcher::evaluate_required(name, table, where_clause)?
                .into_iter()
                .map(|(position, existing)| {
                    let mut candidate = existing.clone();
                    candidate.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                    (position, candidate)
                })
                .collect();

        if let Some(schema) = table.schema() {
            // Uniqueness is checked against untouched records and against
            // the new values of the rest of the batch.
            let positions: BTreeSet<usize> = candidates.iter().map(|(p, _)| *p).collect();
            for (position, candidate) in &candidates {
                let others: Vec<&Record> = table
                    .records()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !positions.contains(i))
                    .map(|(_, r)| r)
                    .chain(
                        candidates
                            .iter()
                            .filter(|(p, _)| p != position)
                            .map(|(_, c)| c),
                    )
                    .collect();
                SchemaValidator::validate_record(name, schema, candidate, &others)?;
            }
        }

        let updated: Vec<Record> = candidates.iter().map(|(_, c)| c.clone()).collect();
        self.store.replace_records(name, candidates);
        Ok(updated)
    }

    fn try_delete(&mut self, name: &str, where_clause: &WhereClause) -> DbResult<Vec<Record>> {
        let table = self.resolve(name)?;
        let positions: Vec<usize> = RecordMatcher::evaluate_required(name, table, where_clause)?
            .into_iter()
            .map(|(position, _)| position)
            .collect();

        self.store
            .remove_records(name, &positions)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Records the outcome of one public operation
    fn observe<T>(
        &self,
        operation: Operation,
        table: &str,
        result: &DbResult<T>,
        affected: impl FnOnce(&T) -> usize,
    ) {
        match result {
            Ok(value) => {
                let count = affected(value);
                self.metrics.increment_executed();
                match operation {
                    Operation::CreateTable => self.metrics.increment_tables_created(),
                    Operation::DeleteTable => self.metrics.increment_tables_dropped(),
                    Operation::Insert => self.metrics.add_inserted(count as u64),
                    Operation::Select => self.metrics.add_selected(count as u64),
                    Operation::Update => self.metrics.add_updated(count as u64),
                    Operation::Delete => self.metrics.add_deleted(count as u64),
                }
                self.logger.log(
                    operation.severity(),
                    operation.event(),
                    &[
                        ("operation", operation.as_str()),
                        ("records", &count.to_string()),
                        ("table", table),
                    ],
                );
            }
            Err(err) => {
                self.metrics.increment_rejected();
                self.logger.warn(
                    Event::OperationRejected,
                    &[
                        ("code", err.code()),
                        ("operation", operation.as_str()),
                        ("reason", &err.to_string()),
                        ("table", table),
                    ],
                );
            }
        }
    }
}

/// Rejects NaN and infinities, which a snapshot could not carry
pub(crate) fn check_finite(table: &str, record: &Record) -> DbResult<()> {
    match record.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(DbError::non_finite_number(table, field)),
        None => Ok(()),
    }
}
