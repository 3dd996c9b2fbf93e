//! Column model.

use bench_core::Row;

use crate::error::SchemaError;
use crate::types::{parse_column_type, ColumnType};

/// One column of a table, as described by the information schema.
///
/// The declared type string is parsed eagerly so a malformed descriptor
/// fails schema load instead of data generation.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    position: i64,
    nullable: bool,
    spanner_type: String,
    parsed_type: ColumnType,
    primary_key: bool,
    allow_commit_timestamp: bool,
    generated: bool,
    state: String,
}

impl Column {
    pub fn new(name: impl Into<String>, spanner_type: impl Into<String>) -> Result<Self, SchemaError> {
        let spanner_type = spanner_type.into();
        let parsed_type = parse_column_type(&spanner_type)?;
        Ok(Self {
            name: name.into(),
            position: 0,
            nullable: false,
            spanner_type,
            parsed_type,
            primary_key: false,
            allow_commit_timestamp: false,
            generated: false,
            state: String::new(),
        })
    }

    /// Decode a column from a `GetColumnsQuery` result row.
    pub fn from_row(row: &Row) -> Result<Self, SchemaError> {
        let spanner_type = row.get_string("SPANNER_TYPE")?;
        let parsed_type = parse_column_type(&spanner_type)?;
        Ok(Self {
            name: row.get_string("COLUMN_NAME")?,
            position: row.get_i64("ORDINAL_POSITION")?,
            nullable: row.get_string("IS_NULLABLE")? == "YES",
            spanner_type,
            parsed_type,
            primary_key: row.get_bool("IS_PRIMARY_KEY")?,
            allow_commit_timestamp: row.get_bool("ALLOW_COMMIT_TIMESTAMP")?,
            generated: row.get_bool("IS_GENERATED")?,
            state: row.get_string("SPANNER_STATE")?,
        })
    }

    pub fn with_primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn with_allow_commit_timestamp(mut self) -> Self {
        self.allow_commit_timestamp = true;
        self
    }

    pub fn with_generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// The raw declared type string.
    pub fn spanner_type(&self) -> &str {
        &self.spanner_type
    }

    pub fn column_type(&self) -> ColumnType {
        self.parsed_type
    }

    pub fn primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn allow_commit_timestamp(&self) -> bool {
        self.allow_commit_timestamp
    }

    pub fn generated(&self) -> bool {
        self.generated
    }

    pub fn state(&self) -> &str {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnKind;

    #[test]
    fn parses_declared_type_eagerly() {
        let col = Column::new("Name", "STRING(64)").unwrap();
        assert_eq!(col.column_type().base, ColumnKind::String);
        assert_eq!(col.column_type().length, Some(64));
        assert!(Column::new("Name", "BOGUS").is_err());
    }
}
