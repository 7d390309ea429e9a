//! CRUD executor subsystem for shelfdb
//!
//! Composes storage, schema validation, and where-clause matching into
//! the public operations of [`Database`].
//!
//! # Execution Flow (strict order)
//!
//! 1. Resolve the table
//! 2. Validate the mutation against the schema, if any
//! 3. Select affected records
//! 4. Apply the mutation
//!
//! # Invariants
//!
//! - All-or-nothing: a failed operation mutates nothing
//! - Deterministic: same inputs, same outcome (with sequential ids)
//! - Insertion order is preserved

mod database;
mod errors;
mod filters;
mod identity;

pub use database::Database;
pub(crate) use database::check_finite;
pub use errors::{DbError, DbResult};
pub use filters::{RecordMatcher, WhereClause};
pub use identity::{IdGenerator, IdStrategy};
