//! spanner-bench: a workload generator and benchmarking harness for
//! strongly-typed, interleaved-table SQL databases.
//!
//! The engine lives in the workspace crates (`bench-core`, `bench-schema`,
//! `bench-generator`, `bench-workload`); this crate is the command-line
//! surface wiring them together.
//!
//! # Usage
//!
//! ```bash
//! # Print the effective configuration
//! spanner-bench config dump --validate
//!
//! # Bulk-load tables (interleaved parents are loaded first)
//! spanner-bench load -t Singers,Albums --threads 10 -o 10000
//!
//! # Issue a 50/50 read/write mix against one table
//! spanner-bench run -t Singers -r 50 -w 50 -o 10000 --read-stale --staleness 15s
//! ```

pub mod cli;
pub mod client;
pub mod commands;
