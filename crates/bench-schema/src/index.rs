//! Secondary index model.

use bench_core::Row;

use crate::error::SchemaError;

/// A secondary index on a table. The `PRIMARY_KEY` pseudo-index and
/// database-managed indexes are filtered out at query time.
#[derive(Debug, Clone)]
pub struct Index {
    name: String,
    unique: bool,
    null_filtered: bool,
    state: String,
}

impl Index {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique: false,
            null_filtered: false,
            state: String::new(),
        }
    }

    /// Decode an index from a `GetIndexesQuery` result row.
    pub fn from_row(row: &Row) -> Result<Self, SchemaError> {
        Ok(Self {
            name: row.get_string("INDEX_NAME")?,
            unique: row.get_bool("IS_UNIQUE")?,
            null_filtered: row.get_bool("IS_NULL_FILTERED")?,
            state: row.get_string("INDEX_STATE")?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique(&self) -> bool {
        self.unique
    }

    pub fn null_filtered(&self) -> bool {
        self.null_filtered
    }

    pub fn state(&self) -> &str {
        &self.state
    }
}
