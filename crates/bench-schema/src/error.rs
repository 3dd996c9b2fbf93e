//! Schema error types.

use bench_core::{ClientError, value::RowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown column type '{0}'")]
    BadType(String),

    #[error("table '{table}' references a parent table '{parent}' that is not in information schema")]
    UnknownParent { table: String, parent: String },

    #[error("interleave cycle detected at table '{0}'")]
    Cycle(String),

    #[error("no columns associated with table '{0}'")]
    NoColumns(String),

    #[error("can not generate point read without predicates")]
    NoPredicates,

    #[error("no primary keys associated with table '{0}'")]
    NoPrimaryKey(String),

    #[error("decoding information schema row: {0}")]
    Decode(#[from] RowError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
