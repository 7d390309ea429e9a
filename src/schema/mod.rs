//! Schema subsystem for shelfdb
//!
//! Schemas are optional per table. When present they are enforced on
//! every write, before the table is touched.
//!
//! # Design Principles
//!
//! - Closed type vocabulary, checked by exhaustive match
//! - Engine-owned `__ID` identity on every schema-backed table
//! - No coercion: `"1"` is text, `true` is not a number
//! - Violations reject the whole operation

mod checker;
mod errors;
mod types;
mod validator;

pub use checker::TypeChecker;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use types::{FieldConstraint, FieldType, Schema, ID_FIELD};
pub use validator::SchemaValidator;
