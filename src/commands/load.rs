//! The `load` command: bulk-insert generated rows.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::info;

use bench_schema::Schema;
use bench_workload::{CoreWorkload, MetricsRegistry, WorkloadConfig};

use crate::cli::{Cli, LoadArgs};
use crate::commands::{cancel_on_interrupt, load_config};

pub async fn run(cli: &Cli, args: &LoadArgs) -> anyhow::Result<()> {
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

    info!("Validating configuration");
    config.validate()?;

    info!("\n{}", serde_yaml::to_string(&config)?);
    if args.dry {
        info!("Exiting (--dry)");
        return Ok(());
    }

    // A load phase wants write sessions, not read sessions.
    config.pool.write_sessions = 1.0;
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

    info!("Executing load phase");
    let run_timer = registry.timer("run");
    let start = Instant::now();
    let result = workload.load(args.table.clone()).await;
    run_timer.record(start.elapsed());
    workload.stop();
    result?;

    info!("\n{}", registry.summary());
    Ok(())
}
