//! The `run` command: a weighted read/write mix against one table.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::info;

use bench_core::duration::parse_duration;
use bench_schema::Schema;
use bench_workload::{CoreWorkload, MetricsRegistry, WorkloadConfig};

use crate::cli::{Cli, RunArgs};
use crate::commands::{cancel_on_interrupt, load_config};

pub async fn run(cli: &Cli, args: &RunArgs) -> anyhow::Result<()> {
    if args.table.is_empty() {
        anyhow::bail!("missing table name (-t)");
    }

    info!("Loading configuration");
    let mut config = load_config(cli)?;
    if let Some(operations) = args.operations {
        config.operations.total = operations;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    if let Some(num_conns) = args.num_conns {
        config.num_conns = num_conns;
    }
    if let Some(reads) = args.reads {
        config.operations.read = reads;
    }
    if let Some(writes) = args.writes {
        config.operations.write = writes;
    }
    if let Some(sample_size) = args.sample_size {
        config.operations.sample_size = sample_size;
    }
    if args.read_stale {
        config.operations.read_stale = true;
    }
    if let Some(staleness) = &args.staleness {
        config.operations.staleness =
            parse_duration(staleness).map_err(|e| anyhow::anyhow!("--staleness: {e}"))?;
    }

    info!("Validating configuration");
    config.validate()?;

    info!("\n{}", serde_yaml::to_string(&config)?);
    if args.dry {
        info!("Exiting (--dry)");
        return Ok(());
    }

    let config = Arc::new(config);
    let connection = crate::client::connect(&config).await?;

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    let registry = Arc::new(MetricsRegistry::new());

    info!("Inferring schema from database");
    let schema_timer = registry.timer("schema.inference");
    let start = Instant::now();
    let schema = Schema::load(connection.as_ref()).await?;
    schema_timer.record(start.elapsed());

    info!("Creating workload");
    let mut workload = CoreWorkload::new(WorkloadConfig {
        config,
        schema,
        connection,
        cancel,
        registry: registry.clone(),
    });

    info!("Executing run phase");
    let run_timer = registry.timer("run");
    let start = Instant::now();
    let result = workload.run(&args.table).await;
    run_timer.record(start.elapsed());
    workload.stop();
    result?;

    info!("\n{}", registry.summary());
    Ok(())
}
