//! One table: optional schema plus ordered records

use crate::schema::Schema;
use crate::value::Record;

/// A stored table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    schema: Option<Schema>,
    records: Vec<Record>,
}

impl Table {
    /// Creates an empty table
    pub fn new(schema: Option<Schema>) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    /// Creates a table with existing records (snapshot import)
    pub(crate) fn with_records(schema: Option<Schema>, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    /// Returns the registered schema, `None` for schema-less tables
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Returns the records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Replaces records at the given positions.
    ///
    /// Positions must be in bounds.
    pub(crate) fn replace(&mut self, replacements: Vec<(usize, Record)>) {
        for (index, record) in replacements {
            self.records[index] = record;
        }
    }

    /// Removes records at the given ascending positions, keeping the
    /// relative order of the rest. Returns the removed records in order.
    pub(crate) fn remove(&mut self, positions: &[usize]) -> Vec<Record> {
        let mut removed = Vec::with_capacity(positions.len());
        let mut kept = Vec::with_capacity(self.records.len().saturating_sub(positions.len()));
        let mut targets = positions.iter().copied().peekable();

        for (index, record) in std::mem::take(&mut self.records).into_iter().enumerate() {
            if targets.peek() == Some(&index) {
                targets.next();
                removed.push(record);
            } else {
                kept.push(record);
            }
        }

        self.records = kept;
        removed
    }

    pub(crate) fn into_records(self) -> Vec<Record> {
        self.records
    }
}
