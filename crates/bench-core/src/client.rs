//! The opaque driver interface the workload engine runs against.
//!
//! Concrete drivers (a gRPC adapter, the in-process [`crate::MemoryConnection`])
//! implement [`Connection`]; the engine never sees anything more specific.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::value::{Key, Mutation, Row, Statement};

/// How a read should be bound in time.
///
/// The single-use read-only transaction of the underlying driver is folded
/// into an explicit bound passed with each read, so callers can observe
/// which bound every read used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampBound {
    /// Read the most recent committed state.
    Strong,
    /// Read state exactly this far in the past.
    ExactStaleness(Duration),
}

/// A session-pooled database client.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Apply a batch of mutations atomically.
    async fn apply(&self, mutations: Vec<Mutation>) -> Result<(), ClientError>;

    /// Execute a parameterized query and collect all result rows.
    async fn query(&self, statement: Statement) -> Result<Vec<Row>, ClientError>;

    /// Point-read one row by primary key, returning `None` when absent.
    async fn read_row(
        &self,
        bound: TimestampBound,
        table: &str,
        key: &Key,
        columns: &[String],
    ) -> Result<Option<Row>, ClientError>;
}
