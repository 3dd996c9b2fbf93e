//! In-process [`Connection`] double.
//!
//! Serves the information-schema queries from registered table fixtures,
//! stores applied mutations as rows, and answers point reads and
//! TABLESAMPLE queries from that stored state. Latency and failure
//! injection make the timeout and fatal-error paths testable without a
//! network. The integration suite and the hidden plumbing commands both
//! run the full engine against this type.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::client::{Connection, TimestampBound};
use crate::error::{ClientError, ErrorCode};
use crate::value::{Key, Mutation, Row, Statement, Value};

/// Schema fixture for one table.
#[derive(Debug, Clone)]
pub struct TableFixture {
    pub name: String,
    pub table_type: String,
    pub parent: Option<String>,
    pub on_delete: Option<String>,
    pub columns: Vec<ColumnFixture>,
    pub indexes: Vec<IndexFixture>,
}

impl TableFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: "BASE TABLE".to_string(),
            parent: None,
            on_delete: None,
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Mark this table as interleaved in the named parent.
    pub fn interleave_in(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self.on_delete = Some("CASCADE".to_string());
        self
    }

    pub fn column(mut self, column: ColumnFixture) -> Self {
        self.columns.push(column);
        self
    }

    pub fn index(mut self, index: IndexFixture) -> Self {
        self.indexes.push(index);
        self
    }

    fn primary_key_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Schema fixture for one column.
#[derive(Debug, Clone)]
pub struct ColumnFixture {
    pub name: String,
    pub spanner_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub allow_commit_timestamp: bool,
    pub generated: bool,
}

impl ColumnFixture {
    pub fn new(name: impl Into<String>, spanner_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spanner_type: spanner_type.into(),
            nullable: false,
            primary_key: false,
            allow_commit_timestamp: false,
            generated: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn allow_commit_timestamp(mut self) -> Self {
        self.allow_commit_timestamp = true;
        self
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }
}

/// Schema fixture for one secondary index.
#[derive(Debug, Clone)]
pub struct IndexFixture {
    pub name: String,
    pub unique: bool,
    pub null_filtered: bool,
    pub state: String,
}

impl IndexFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique: false,
            null_filtered: false,
            state: "READ_WRITE".to_string(),
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// One recorded point read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRecord {
    pub table: String,
    pub key: Key,
    pub bound: TimestampBound,
}

#[derive(Default)]
struct State {
    rows: HashMap<String, Vec<BTreeMap<String, Value>>>,
    batch_sizes: Vec<usize>,
    reads: Vec<ReadRecord>,
}

/// In-memory database double.
pub struct MemoryConnection {
    fixtures: Vec<TableFixture>,
    state: Mutex<State>,
    latency: Mutex<Option<Duration>>,
    failure: Mutex<Option<ClientError>>,
}

impl MemoryConnection {
    pub fn new(mut fixtures: Vec<TableFixture>) -> Self {
        // The tables view is served ordered by name.
        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            fixtures,
            state: Mutex::new(State::default()),
            latency: Mutex::new(None),
            failure: Mutex::new(None),
        }
    }

    /// Delay every driver call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Fail every subsequent driver call with `error`.
    pub fn set_failure(&self, error: Option<ClientError>) {
        *self.failure.lock().unwrap() = error;
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .rows
            .get(table)
            .map_or(0, Vec::len)
    }

    /// Mutation counts of every `apply` call, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.state.lock().unwrap().batch_sizes.clone()
    }

    pub fn reads(&self) -> Vec<ReadRecord> {
        self.state.lock().unwrap().reads.clone()
    }

    fn fixture(&self, table: &str) -> Option<&TableFixture> {
        self.fixtures.iter().find(|f| f.name == table)
    }

    async fn checkpoint(&self) -> Result<(), ClientError> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn tables_rows(&self, only: Option<&str>) -> Vec<Row> {
        let columns: Vec<String> = [
            "TABLE_CATALOG",
            "TABLE_SCHEMA",
            "TABLE_NAME",
            "TABLE_TYPE",
            "PARENT_TABLE_NAME",
            "ON_DELETE_ACTION",
            "SPANNER_STATE",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        self.fixtures
            .iter()
            .filter(|f| only.map_or(true, |name| f.name == name))
            .map(|f| {
                Row::new(
                    columns.clone(),
                    vec![
                        Value::String(String::new()),
                        Value::String(String::new()),
                        Value::String(f.name.clone()),
                        Value::String(f.table_type.clone()),
                        f.parent
                            .clone()
                            .map_or(Value::Null, Value::String),
                        f.on_delete
                            .clone()
                            .map_or(Value::Null, Value::String),
                        Value::String("COMMITTED".to_string()),
                    ],
                )
            })
            .collect()
    }

    fn columns_rows(&self, table: &str) -> Vec<Row> {
        let columns: Vec<String> = [
            "COLUMN_NAME",
            "ORDINAL_POSITION",
            "IS_NULLABLE",
            "SPANNER_TYPE",
            "SPANNER_STATE",
            "IS_PRIMARY_KEY",
            "IS_GENERATED",
            "ALLOW_COMMIT_TIMESTAMP",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        self.fixture(table)
            .map(|f| {
                f.columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| {
                        Row::new(
                            columns.clone(),
                            vec![
                                Value::String(c.name.clone()),
                                Value::Int64(i as i64 + 1),
                                Value::String(if c.nullable { "YES" } else { "NO" }.to_string()),
                                Value::String(c.spanner_type.clone()),
                                Value::String("COMMITTED".to_string()),
                                Value::Bool(c.primary_key),
                                Value::Bool(c.generated),
                                Value::Bool(c.allow_commit_timestamp),
                            ],
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn indexes_rows(&self, table: &str) -> Vec<Row> {
        let columns: Vec<String> = ["INDEX_NAME", "IS_UNIQUE", "IS_NULL_FILTERED", "INDEX_STATE"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        self.fixture(table)
            .map(|f| {
                f.indexes
                    .iter()
                    .map(|ix| {
                        Row::new(
                            columns.clone(),
                            vec![
                                Value::String(ix.name.clone()),
                                Value::Bool(ix.unique),
                                Value::Bool(ix.null_filtered),
                                Value::String(ix.state.clone()),
                            ],
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn sample_rows(&self, sql: &str) -> Result<Vec<Row>, ClientError> {
        // SELECT c1, c2 FROM t TABLESAMPLE BERNOULLI (x PERCENT)
        let projection = sql
            .strip_prefix("SELECT ")
            .and_then(|rest| rest.split_once(" FROM "))
            .ok_or_else(|| {
                ClientError::new(ErrorCode::InvalidArgument, format!("malformed query: {sql}"))
            })?;
        let columns: Vec<String> = projection
            .0
            .split(", ")
            .map(|s| s.trim().to_string())
            .collect();
        let table = projection
            .1
            .split_whitespace()
            .next()
            .ok_or_else(|| {
                ClientError::new(ErrorCode::InvalidArgument, format!("malformed query: {sql}"))
            })?;

        let state = self.state.lock().unwrap();
        let rows = state.rows.get(table).cloned().unwrap_or_default();
        Ok(rows
            .iter()
            .map(|row| {
                Row::new(
                    columns.clone(),
                    columns
                        .iter()
                        .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
                        .collect(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn apply(&self, mutations: Vec<Mutation>) -> Result<(), ClientError> {
        self.checkpoint().await?;

        let mut state = self.state.lock().unwrap();
        state.batch_sizes.push(mutations.len());
        for mutation in mutations {
            let mut row = BTreeMap::new();
            for (column, value) in mutation.columns.into_iter().zip(mutation.values) {
                let value = match value {
                    Value::CommitTimestamp => Value::Timestamp(Utc::now()),
                    other => other,
                };
                row.insert(column, value);
            }
            state.rows.entry(mutation.table).or_default().push(row);
        }
        Ok(())
    }

    async fn query(&self, statement: Statement) -> Result<Vec<Row>, ClientError> {
        self.checkpoint().await?;

        let sql = statement.sql.as_str();
        if sql.contains("information_schema.tables") {
            let table = match statement.params.get("table_name") {
                Some(Value::String(name)) => Some(name.clone()),
                _ => None,
            };
            return Ok(self.tables_rows(table.as_deref()));
        }
        if sql.contains("INFORMATION_SCHEMA.COLUMNS") {
            if let Some(Value::String(table)) = statement.params.get("table_name") {
                return Ok(self.columns_rows(table));
            }
        }
        if sql.contains("INFORMATION_SCHEMA.INDEXES") {
            if let Some(Value::String(table)) = statement.params.get("table_name") {
                return Ok(self.indexes_rows(table));
            }
        }
        if sql.contains("TABLESAMPLE") {
            return self.sample_rows(sql);
        }

        Err(ClientError::new(
            ErrorCode::InvalidArgument,
            format!("unsupported statement: {sql}"),
        ))
    }

    async fn read_row(
        &self,
        bound: TimestampBound,
        table: &str,
        key: &Key,
        columns: &[String],
    ) -> Result<Option<Row>, ClientError> {
        self.checkpoint().await?;

        let fixture = self.fixture(table).ok_or_else(|| {
            ClientError::new(ErrorCode::NotFound, format!("table '{table}' not found"))
        })?;
        let pk = fixture.primary_key_names();

        let mut state = self.state.lock().unwrap();
        state.reads.push(ReadRecord {
            table: table.to_string(),
            key: key.clone(),
            bound,
        });

        let found = state.rows.get(table).and_then(|rows| {
            rows.iter().find(|row| {
                pk.len() == key.len()
                    && pk
                        .iter()
                        .zip(key.0.iter())
                        .all(|(col, want)| row.get(*col) == Some(want))
            })
        });

        Ok(found.map(|row| {
            Row::new(
                columns.to_vec(),
                columns
                    .iter()
                    .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
                    .collect(),
            )
        }))
    }
}
