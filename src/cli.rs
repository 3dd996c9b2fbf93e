//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "spanner-bench")]
#[command(about = "Workload generator and benchmark harness for interleaved-table SQL databases")]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default is ./spanner-bench.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project identifier
    #[arg(long, short = 'p', global = true)]
    pub project: Option<String>,

    /// Instance identifier
    #[arg(long, short = 'i', global = true)]
    pub instance: Option<String>,

    /// Database name
    #[arg(long, short = 'd', global = true)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Load tables with generated data
    Load(LoadArgs),
    /// Execute a read/write load test
    Run(RunArgs),
    /// Plumbing commands used during development
    #[command(hide = true)]
    Plumbing {
        #[command(subcommand)]
        action: PlumbingAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump {
        /// Validate the configuration before printing
        #[arg(long, short = 'v')]
        validate: bool,
    },
    /// Emit a template configuration file
    Init,
}

#[derive(Args, Clone)]
pub struct LoadArgs {
    /// Table names to load (comma separated)
    #[arg(long, short = 't', value_delimiter = ',')]
    pub table: Vec<String>,

    /// Number of records to load
    #[arg(long, short = 'o')]
    pub operations: Option<u64>,

    /// Number of worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Dry run: print configuration and plan, then exit
    #[arg(long)]
    pub dry: bool,
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Table name to run against
    #[arg(long, short = 't')]
    pub table: String,

    /// Number of operations to perform
    #[arg(long, short = 'o')]
    pub operations: Option<u64>,

    /// Number of worker threads
    #[arg(long)]
    pub threads: Option<usize>,

    /// Number of driver connections
    #[arg(long)]
    pub num_conns: Option<usize>,

    /// Read weight
    #[arg(long, short = 'r')]
    pub reads: Option<u64>,

    /// Write weight
    #[arg(long, short = 'w')]
    pub writes: Option<u64>,

    /// Percentage of the table to sample for read keys
    #[arg(long, short = 's')]
    pub sample_size: Option<f64>,

    /// Perform stale reads
    #[arg(long)]
    pub read_stale: bool,

    /// Exact staleness bound for stale reads (e.g. 15s)
    #[arg(long)]
    pub staleness: Option<String>,

    /// Dry run: print configuration and plan, then exit
    #[arg(long)]
    pub dry: bool,
}

#[derive(Subcommand)]
pub enum PlumbingAction {
    /// Base-26 key encoding helpers
    Hex {
        #[command(subcommand)]
        action: HexAction,
    },
    /// Parse a column type descriptor
    TypeParse {
        /// The descriptor, e.g. ARRAY<STRING(64)>
        descriptor: String,
    },
    /// Show how operations split across workers
    Bucket {
        total: u64,
        threads: usize,
    },
    /// Run a small LOAD against the in-process backend
    Smoke {
        /// Rows to load into the apex table
        #[arg(long, short = 'o', default_value_t = 1000)]
        operations: u64,
    },
}

#[derive(Subcommand)]
pub enum HexAction {
    /// Encode a number as base-26 text
    Encode {
        value: u64,
        #[arg(long, default_value_t = 8)]
        length: usize,
    },
    /// Decode base-26 text to a number
    Decode { value: String },
}
