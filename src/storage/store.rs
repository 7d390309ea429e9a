//! Table store: owns every table of one database

use std::collections::BTreeMap;

use super::table::Table;
use crate::schema::Schema;
use crate::value::Record;

/// In-memory table map.
///
/// Every method assumes validated input. Methods addressing a table that
/// does not exist return `None` or `false` and change nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStore {
    tables: BTreeMap<String, Table>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty table. Returns `false` if the name is taken.
    pub fn create_table(&mut self, name: &str, schema: Option<Schema>) -> bool {
        self.insert_table(name, Table::new(schema))
    }

    /// Registers a fully built table. Returns `false` if the name is taken.
    pub(crate) fn insert_table(&mut self, name: &str, table: Table) -> bool {
        if self.tables.contains_key(name) {
            return false;
        }
        self.tables.insert(name.to_string(), table);
        true
    }

    /// Removes a table and returns its records
    pub fn drop_table(&mut self, name: &str) -> Option<Vec<Record>> {
        self.tables.remove(name).map(Table::into_records)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Returns the schema slot of a table: `None` if the table is absent,
    /// `Some(None)` if it is schema-less.
    pub fn schema(&self, name: &str) -> Option<Option<&Schema>> {
        self.tables.get(name).map(Table::schema)
    }

    pub fn records(&self, name: &str) -> Option<&[Record]> {
        self.tables.get(name).map(Table::records)
    }

    /// Appends a record and returns a reference to it
    pub fn append_record(&mut self, name: &str, record: Record) -> Option<&Record> {
        let table = self.tables.get_mut(name)?;
        table.push(record);
        table.records().last()
    }

    /// Replaces records in place at the given positions
    pub fn replace_records(&mut self, name: &str, replacements: Vec<(usize, Record)>) -> bool {
        match self.tables.get_mut(name) {
            Some(table) => {
                table.replace(replacements);
                true
            }
            None => false,
        }
    }

    /// Removes records at ascending positions and returns them
    pub fn remove_records(&mut self, name: &str, positions: &[usize]) -> Option<Vec<Record>> {
        self.tables.get_mut(name).map(|table| table.remove(positions))
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Iterates `(name, table)` in name order
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn record_count(&self, name: &str) -> Option<usize> {
        self.tables.get(name).map(Table::len)
    }
}
