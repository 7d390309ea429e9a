//! Observability events for shelfdb
//!
//! Every public database operation emits exactly one event: its success
//! event or `OperationRejected`.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Database instance opened
    DatabaseOpened,

    // Tables
    /// Table registered
    TableCreated,
    /// Table and its records removed
    TableDropped,

    // Records
    /// Record appended
    RecordInserted,
    /// Records read
    RecordsSelected,
    /// Records merged in place
    RecordsUpdated,
    /// Records removed
    RecordsDeleted,

    /// Operation failed validation, nothing changed
    OperationRejected,

    // Snapshots
    /// Snapshot exported
    SnapshotExported,
    /// Database rebuilt from a snapshot
    SnapshotRestored,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DatabaseOpened => "DATABASE_OPENED",
            Event::TableCreated => "TABLE_CREATED",
            Event::TableDropped => "TABLE_DROPPED",
            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordsSelected => "RECORDS_SELECTED",
            Event::RecordsUpdated => "RECORDS_UPDATED",
            Event::RecordsDeleted => "RECORDS_DELETED",
            Event::OperationRejected => "OPERATION_REJECTED",
            Event::SnapshotExported => "SNAPSHOT_EXPORTED",
            Event::SnapshotRestored => "SNAPSHOT_RESTORED",
        }
    }

    /// Returns true if this event changes stored state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Event::TableCreated
                | Event::TableDropped
                | Event::RecordInserted
                | Event::RecordsUpdated
                | Event::RecordsDeleted
                | Event::SnapshotRestored
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::TableCreated.as_str(), "TABLE_CREATED");
        assert_eq!(Event::OperationRejected.to_string(), "OPERATION_REJECTED");
    }

    #[test]
    fn test_mutation_events() {
        assert!(Event::RecordInserted.is_mutation());
        assert!(Event::TableDropped.is_mutation());
        assert!(!Event::RecordsSelected.is_mutation());
        assert!(!Event::OperationRejected.is_mutation());
    }
}
