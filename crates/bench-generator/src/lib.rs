//! Data generation framework.
//!
//! A [`Generator`] yields typed [`Value`]s for one column. The
//! [`factory`] maps `(column type, optional column configuration)` to a
//! concrete generator; the [`selector`] weighs read against write
//! operations; [`sample`] turns sampled primary keys into point-read keys.
//!
//! Generator instances hold RNG state and are not safe for concurrent use:
//! the workload builds one map per job.

pub mod args;
pub mod error;
pub mod factory;
pub mod generators;
pub mod operation;
pub mod sample;
pub mod selector;

use bench_core::Value;
use bench_schema::ColumnKind;

pub use args::GeneratorArgs;
pub use error::GeneratorError;
pub use operation::Operation;
pub use sample::{SampleGenerator, SampleSet};
pub use selector::{SelectorError, WeightedRandom};

/// A source of values for one column.
pub trait Generator: Send {
    /// The next value. Single-threaded per instance.
    fn next_value(&mut self) -> Value;

    /// The scalar base kind this generator produces.
    fn kind(&self) -> ColumnKind;
}

/// Per-table mapping from column name to its generator.
pub type GeneratorMap = std::collections::HashMap<String, Box<dyn Generator>>;
