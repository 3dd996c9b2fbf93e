//! Schema model and discovery.
//!
//! Tables, columns and indexes are loaded from the database's
//! information-schema views into an immutable in-memory model. After
//! [`Tables::traverse`] resolves interleave relationships, the model also
//! answers apex/bottom navigation and derives the SQL statements the
//! workload engine issues (point inserts, point reads, table samples).

pub mod column;
pub mod error;
pub mod index;
pub mod information;
pub mod schema;
pub mod table;
pub mod tables;
pub mod types;

pub use column::Column;
pub use error::SchemaError;
pub use index::Index;
pub use schema::Schema;
pub use table::Table;
pub use tables::Tables;
pub use types::{parse_column_type, ColumnKind, ColumnType, MAX_LENGTH};
