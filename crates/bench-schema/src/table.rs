//! Table model and derived SQL statements.

use std::fmt::Write as _;

use bench_core::Row;

use crate::column::Column;
use crate::error::SchemaError;
use crate::index::Index;

/// One table (or view) from the information schema.
///
/// Interleave links are stored as arena indices into the owning
/// [`crate::Tables`] collection; they are `None` until
/// [`crate::Tables::traverse`] runs.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    table_type: String,
    parent_name: Option<String>,
    child_name: Option<String>,
    pub(crate) parent: Option<usize>,
    pub(crate) child: Option<usize>,
    columns: Vec<Column>,
    indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: "BASE TABLE".to_string(),
            parent_name: None,
            child_name: None,
            parent: None,
            child: None,
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Decode a table from a `ListTablesQuery` result row.
    pub fn from_row(row: &Row) -> Result<Self, SchemaError> {
        let mut table = Table::new(row.get_string("TABLE_NAME")?);
        table.table_type = row.get_string("TABLE_TYPE")?;
        table.parent_name = row.get_opt_string("PARENT_TABLE_NAME")?;
        Ok(table)
    }

    pub fn with_parent_name(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_type(&self) -> &str {
        &self.table_type
    }

    pub fn is_view(&self) -> bool {
        self.table_type == "VIEW"
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    pub fn child_name(&self) -> Option<&str> {
        self.child_name.as_deref()
    }

    pub(crate) fn set_child_name(&mut self, child: &str) {
        self.child_name = Some(child.to_string());
    }

    pub fn has_parent(&self) -> bool {
        self.parent_name.is_some()
    }

    pub fn has_child(&self) -> bool {
        self.child_name.is_some()
    }

    /// A table is interleaved when it has a parent or a child.
    pub fn is_interleaved(&self) -> bool {
        self.has_parent() || self.has_child()
    }

    /// The apex of an interleave chain has no parent.
    pub fn is_apex(&self) -> bool {
        self.parent_name.is_none()
    }

    /// The bottom of an interleave chain has no child.
    pub fn is_bottom(&self) -> bool {
        self.child_name.is_none()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn primary_keys(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.primary_key()).collect()
    }

    pub fn primary_key_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.primary_key())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// `INSERT INTO t(c1, c2) VALUES(@c1, @c2)`
    pub fn point_insert_statement(&self) -> Result<String, SchemaError> {
        let cols = self.column_names();
        if cols.is_empty() {
            return Err(SchemaError::NoColumns(self.name.clone()));
        }

        let mut sql = String::new();
        let _ = write!(sql, "INSERT INTO {}({}) VALUES(", self.name, cols.join(", "));
        for (i, col) in cols.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "@{col}");
        }
        sql.push(')');

        Ok(sql)
    }

    /// `SELECT c1, c2 FROM t WHERE p1 = @p1 AND p2 = @p2`
    pub fn point_read_statement(&self, predicates: &[&str]) -> Result<String, SchemaError> {
        if predicates.is_empty() {
            return Err(SchemaError::NoPredicates);
        }
        let cols = self.column_names();
        if cols.is_empty() {
            return Err(SchemaError::NoColumns(self.name.clone()));
        }

        let mut sql = String::new();
        let _ = write!(sql, "SELECT {} FROM {} WHERE ", cols.join(", "), self.name);
        for (i, predicate) in predicates.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            let _ = write!(sql, "{predicate} = @{predicate}");
        }

        Ok(sql)
    }

    /// `SELECT pk1, pk2 FROM t TABLESAMPLE BERNOULLI (x PERCENT)`
    pub fn table_sample(&self, percent: f64) -> Result<String, SchemaError> {
        let pkeys = self.primary_key_names();
        if pkeys.is_empty() {
            return Err(SchemaError::NoPrimaryKey(self.name.clone()));
        }

        Ok(format!(
            "SELECT {} FROM {} TABLESAMPLE BERNOULLI ({} PERCENT)",
            pkeys.join(", "),
            self.name,
            percent
        ))
    }
}
