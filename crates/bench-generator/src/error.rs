//! Generator error types.

use thiserror::Error;

use bench_schema::ColumnKind;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("unsupported generator type '{0}'")]
    UnknownGeneratorType(String),

    #[error("invalid generator argument {what}: expected {expected}, got {actual}")]
    BadGeneratorArg {
        what: String,
        expected: &'static str,
        actual: String,
    },

    #[error("{0} generator requires a length > 0")]
    InvalidLength(&'static str),

    #[error("invalid column length {length} for {kind} UUID")]
    InvalidUuidShape { kind: ColumnKind, length: i64 },

    #[error("invalid column type {0} for UUID")]
    InvalidUuidType(ColumnKind),

    #[error("combined generator prefix length {prefix} must be shorter than string length {total}")]
    InvalidPrefixLength { prefix: usize, total: usize },

    #[error("thread-partitioned generator requires row and thread counts > 0")]
    InvalidPartition,

    #[error("sub-range generator requires at least one range")]
    EmptySubRange,

    #[error("static generator requires at least one value")]
    EmptyStatic,

    #[error("no generator available for column '{column}' ({kind})")]
    NoGenerator { column: String, kind: ColumnKind },
}

impl GeneratorError {
    /// Shorthand for argument-shape mismatches.
    pub fn bad_arg(
        what: impl Into<String>,
        expected: &'static str,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::BadGeneratorArg {
            what: what.into(),
            expected,
            actual: format!("{actual:?}"),
        }
    }
}
