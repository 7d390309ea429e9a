//! Snapshot serialization format (JSON)

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::executor::{DbError, DbResult};
use crate::schema::Schema;
use crate::value::Record;

/// Current snapshot format version
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Image of one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Registered schema, absent for schema-less tables
    #[serde(default)]
    pub schema: Option<Schema>,
    /// Records in table order
    #[serde(default)]
    pub records: Vec<Record>,
}

/// Image of a whole database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub format_version: u32,
    pub tables: BTreeMap<String, TableSnapshot>,
}

impl Default for DatabaseSnapshot {
    fn default() -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            tables: BTreeMap::new(),
        }
    }
}

impl DatabaseSnapshot {
    /// Writes the snapshot as pretty-printed JSON
    pub fn write_to<W: Write>(&self, writer: W) -> DbResult<()> {
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| DbError::SnapshotIo(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Reads a snapshot from JSON. The content is not validated until it
    /// is restored.
    pub fn read_from<R: Read>(reader: R) -> DbResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| DbError::SnapshotIo(format!("Invalid snapshot JSON: {}", e)))
    }

    /// Saves the snapshot to a file, replacing any existing content
    pub fn save(&self, path: &Path) -> DbResult<()> {
        let file = File::create(path).map_err(|e| {
            DbError::SnapshotIo(format!("Failed to create '{}': {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(|e| {
            DbError::SnapshotIo(format!("Failed to write '{}': {}", path.display(), e))
        })
    }

    /// Loads a snapshot from a file
    pub fn load(path: &Path) -> DbResult<Self> {
        let file = File::open(path).map_err(|e| {
            DbError::SnapshotIo(format!("Failed to open '{}': {}", path.display(), e))
        })?;
        Self::read_from(BufReader::new(file))
    }
}
