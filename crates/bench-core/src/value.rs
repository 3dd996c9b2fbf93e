//! Typed values exchanged with the database driver.
//!
//! A single [`Value`] enum covers every column type the engine can
//! generate or read back, so generators, mutations and row decoding all
//! speak one language. Arrays are homogeneous `Value::Array` vectors and
//! the commit-timestamp sentinel is its own variant so a driver adapter
//! can translate it to whatever its wire format expects.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// A single typed database value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    /// Exact decimal, carried as its textual form.
    Numeric(String),
    Json(serde_json::Value),
    /// Sentinel asking the database to write its commit timestamp.
    CommitTimestamp,
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Timestamp(_) => "timestamp",
            Value::Date(_) => "date",
            Value::Numeric(_) => "numeric",
            Value::Json(_) => "json",
            Value::CommitTimestamp => "commit_timestamp",
            Value::Array(_) => "array",
        }
    }
}

/// A composite primary key used for point reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Key(pub Vec<Value>);

impl Key {
    pub fn new(parts: Vec<Value>) -> Self {
        Self(parts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Key {
    fn from(parts: Vec<Value>) -> Self {
        Self(parts)
    }
}

/// A single-row insert, expressed as parallel column/value lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl Mutation {
    /// Build an insert mutation from `(column, value)` pairs.
    pub fn insert(table: impl Into<String>, row: Vec<(String, Value)>) -> Self {
        let mut columns = Vec::with_capacity(row.len());
        let mut values = Vec::with_capacity(row.len());
        for (column, value) in row {
            columns.push(column);
            values.push(value);
        }
        Self {
            table: table.into(),
            columns,
            values,
        }
    }
}

/// A parameterized SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: std::collections::BTreeMap<String, Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: std::collections::BTreeMap::new(),
        }
    }

    pub fn add_param(&mut self, name: impl Into<String>, value: Value) {
        self.params.insert(name.into(), value);
    }
}

/// Failure while pulling a typed value out of a [`Row`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowError {
    #[error("row has no column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' holds {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A row returned by a query or point read.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    fn require(&self, column: &str) -> Result<&Value, RowError> {
        self.get(column)
            .ok_or_else(|| RowError::MissingColumn(column.to_string()))
    }

    fn mismatch(column: &str, expected: &'static str, actual: &Value) -> RowError {
        RowError::TypeMismatch {
            column: column.to_string(),
            expected,
            actual: actual.type_name(),
        }
    }

    pub fn get_string(&self, column: &str) -> Result<String, RowError> {
        match self.require(column)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(Self::mismatch(column, "string", other)),
        }
    }

    /// String column that may be NULL.
    pub fn get_opt_string(&self, column: &str) -> Result<Option<String>, RowError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(Self::mismatch(column, "string", other)),
        }
    }

    pub fn get_i64(&self, column: &str) -> Result<i64, RowError> {
        match self.require(column)? {
            Value::Int64(v) => Ok(*v),
            other => Err(Self::mismatch(column, "int64", other)),
        }
    }

    pub fn get_bool(&self, column: &str) -> Result<bool, RowError> {
        match self.require(column)? {
            Value::Bool(v) => Ok(*v),
            other => Err(Self::mismatch(column, "bool", other)),
        }
    }
}
