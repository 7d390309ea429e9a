//! shelfdb - A strict, embeddable, in-process record store
//!
//! Callers create named tables, optionally with a declarative schema,
//! and read or mutate records with flat equality where clauses. Every
//! operation is all-or-nothing.
//!
//! ```
//! use shelfdb::{Database, FieldConstraint, FieldType, Schema, WhereClause, Value, Record};
//!
//! let mut db = Database::new();
//! let schema = Schema::new().with_field("n", FieldConstraint::unique(FieldType::Number));
//! db.create_table("T", Some(schema)).unwrap();
//!
//! let mut fields = Record::new();
//! fields.insert("n".to_string(), Value::from(1));
//! let stored = db.insert("T", fields.clone()).unwrap();
//! assert!(stored.contains_key("__ID"));
//!
//! // Unique field: the same value is rejected
//! assert!(db.insert("T", fields).is_err());
//!
//! let found = db.select("T", Some(&WhereClause::new().equals("n", 1))).unwrap();
//! assert_eq!(found.len(), 1);
//! ```

pub mod config;
pub mod executor;
pub mod observability;
pub mod schema;
pub mod snapshot;
pub mod storage;
pub mod value;

pub use config::{ConfigError, DatabaseConfig};
pub use executor::{Database, DbError, DbResult, IdStrategy, RecordMatcher, WhereClause};
pub use schema::{FieldConstraint, FieldType, Schema, SchemaError, ID_FIELD};
pub use snapshot::DatabaseSnapshot;
pub use value::{record_from_json, Number, Record, Value};
