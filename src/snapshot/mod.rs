//! Snapshot subsystem for shelfdb
//!
//! A snapshot is the opaque, serializable image of a whole database:
//! every table's schema and records. Persistence layers save and load
//! snapshots around calls to the engine; the engine itself never
//! touches storage media on its own.
//!
//! # Design Principles
//!
//! - Deterministic output (tables and fields in sorted order)
//! - Zero partial success: a restore either yields a database that
//!   satisfies every invariant or fails
//! - Restores re-validate; nothing in a snapshot is trusted

mod format;
mod restore;

pub use format::{DatabaseSnapshot, TableSnapshot, SNAPSHOT_FORMAT_VERSION};
