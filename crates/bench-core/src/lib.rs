//! Shared type universe for the spanner-bench workspace.
//!
//! This crate defines the pieces every other crate builds on: the typed
//! [`Value`] model with its `Key`/`Mutation`/`Statement`/`Row` companions,
//! the opaque [`Connection`] trait the workload engine drives, the
//! gRPC-style error taxonomy, and the YAML configuration model.
//!
//! The concrete database driver lives behind [`Connection`]; the in-process
//! [`MemoryConnection`] double ships in-tree so the engine and its tests can
//! run without a network.

pub mod client;
pub mod config;
pub mod duration;
pub mod error;
pub mod memory;
pub mod value;

pub use client::{Connection, TimestampBound};
pub use config::{Config, ConfigValue};
pub use error::{ClientError, ErrorCode};
pub use memory::MemoryConnection;
pub use value::{Key, Mutation, Row, Statement, Value};
