//! Workload planning and execution.
//!
//! The [`core::CoreWorkload`] turns a set of target tables into a plan of
//! [`target::Target`]s, buckets each target's operations across a fixed
//! worker [`pool`], and drives [`job::WorkloadJob`]s through it while the
//! [`metrics`] registry collects rates and latencies.

pub mod core;
pub mod error;
pub mod job;
pub mod metrics;
pub mod pool;
pub mod target;

pub use crate::core::{CoreWorkload, WorkloadConfig};
pub use error::WorkloadError;
pub use metrics::MetricsRegistry;

/// The two phases a workload can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    /// Bulk-insert rows into the target tables.
    Load,
    /// Issue a read/write mix against one table.
    Run,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::Load => f.write_str("LOAD"),
            JobType::Run => f.write_str("RUN"),
        }
    }
}
