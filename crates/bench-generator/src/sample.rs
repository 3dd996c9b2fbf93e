//! Sample-based point-read key generation.
//!
//! The table is sampled through `TABLESAMPLE BERNOULLI`, the primary-key
//! columns of the sampled rows are collected into per-column vectors, and
//! the [`SampleGenerator`] then yields random composite keys from them.

use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

use bench_core::{ClientError, Connection, Key, Statement, Value};
use bench_schema::{SchemaError, Table};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("can not use zero length table samples to generate reads (is there data loaded?)")]
    Empty,

    #[error("samples for composite primary keys must be of equal length ({column} column mismatch)")]
    LengthMismatch { column: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Sampled primary-key values, one vector per key column, in key order.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub columns: Vec<(String, Vec<Value>)>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sample a table's primary keys for read-key generation.
pub async fn sample_table(
    sample_percent: f64,
    connection: &dyn Connection,
    table: &Table,
) -> Result<SampleSet, SampleError> {
    let sql = table.table_sample(sample_percent)?;
    let rows = connection.query(Statement::new(sql)).await?;

    let pk_names = table.primary_key_names();
    let mut columns: Vec<(String, Vec<Value>)> = pk_names
        .iter()
        .map(|name| (name.clone(), Vec::with_capacity(rows.len())))
        .collect();

    for row in &rows {
        for (name, values) in columns.iter_mut() {
            values.push(row.get(name).cloned().unwrap_or(Value::Null));
        }
    }

    Ok(SampleSet { columns })
}

/// Yields uniformly random composite keys from a [`SampleSet`].
pub struct SampleGenerator {
    rng: StdRng,
    samples: SampleSet,
    len: usize,
}

impl SampleGenerator {
    pub fn new(rng: StdRng, samples: SampleSet) -> Result<Self, SampleError> {
        if samples.columns.is_empty() {
            return Err(SampleError::Empty);
        }

        let len = samples.len();
        if len == 0 {
            return Err(SampleError::Empty);
        }
        for (column, values) in &samples.columns {
            if values.len() != len {
                return Err(SampleError::LengthMismatch {
                    column: column.clone(),
                });
            }
        }

        Ok(Self { rng, samples, len })
    }

    /// The next composite key: one row index drawn uniformly, all key
    /// columns taken from that index.
    pub fn next_key(&mut self) -> Key {
        let idx = self.rng.gen_range(0..self.len);
        Key::new(
            self.samples
                .columns
                .iter()
                .map(|(_, values)| values[idx].clone())
                .collect(),
        )
    }
}
