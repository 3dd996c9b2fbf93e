//! Workload error types.

use thiserror::Error;

use bench_core::ClientError;
use bench_generator::sample::SampleError;
use bench_generator::{GeneratorError, SelectorError};
use bench_schema::SchemaError;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("table '{0}' missing from information schema")]
    TableNotFound(String),

    #[error("can only execute run against apex table (try '{0}')")]
    NonApexRun(String),

    #[error("max execution time reached")]
    Timeout,

    #[error("fatal driver error: {0}")]
    Fatal(#[source] ClientError),

    #[error("creating generator map: {0}")]
    Generator(#[from] GeneratorError),

    #[error("creating operation selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("sampling table: {0}")]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
