//! The commit-timestamp sentinel.

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::Generator;

/// Always yields the commit-timestamp sentinel.
///
/// Columns declared with `allow_commit_timestamp` get this generator no
/// matter what else their configuration says.
#[derive(Default)]
pub struct CommitTimestampGenerator;

impl CommitTimestampGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for CommitTimestampGenerator {
    fn next_value(&mut self) -> Value {
        Value::CommitTimestamp
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Timestamp
    }
}
