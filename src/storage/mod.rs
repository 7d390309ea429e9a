//! Table storage subsystem for shelfdb
//!
//! Holds table name to {schema, ordered records}. Storage is a pure
//! container: it performs no business-rule checks and assumes the
//! executor validated every mutation before calling it.
//!
//! # Design Principles
//!
//! - Schema and records live in one entry, so a table exists in both
//!   or in neither
//! - Insertion order is preserved until a record is removed
//! - In place replacement keeps record positions

mod table;
mod store;

pub use store::TableStore;
pub use table::Table;
