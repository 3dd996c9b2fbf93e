//! Hidden development diagnostics.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use bench_core::memory::{ColumnFixture, TableFixture};
use bench_core::{Config, MemoryConnection};
use bench_generator::generators::HexavigesimalGenerator;
use bench_schema::{parse_column_type, Schema};
use bench_workload::core::bucket_operations;
use bench_workload::{CoreWorkload, MetricsRegistry, WorkloadConfig};

use crate::cli::{Cli, HexAction, PlumbingAction};

pub async fn run(_cli: &Cli, action: &PlumbingAction) -> anyhow::Result<()> {
    match action {
        PlumbingAction::Hex { action } => match action {
            HexAction::Encode { value, length } => {
                println!("{}", HexavigesimalGenerator::encode(*value, *length));
                Ok(())
            }
            HexAction::Decode { value } => {
                println!("{}", HexavigesimalGenerator::decode(value));
                Ok(())
            }
        },
        PlumbingAction::TypeParse { descriptor } => {
            let parsed = parse_column_type(descriptor)?;
            println!("{parsed:?}");
            Ok(())
        }
        PlumbingAction::Bucket { total, threads } => {
            println!("{:?}", bucket_operations(*total, *threads));
            Ok(())
        }
        PlumbingAction::Smoke { operations } => smoke(*operations).await,
    }
}

/// Run a complete interleaved LOAD against the in-process backend, as an
/// end-to-end sanity check of schema discovery, planning and execution.
async fn smoke(operations: u64) -> anyhow::Result<()> {
    let connection = Arc::new(MemoryConnection::new(vec![
        TableFixture::new("Singers")
            .column(ColumnFixture::new("SingerId", "INT64").primary_key())
            .column(ColumnFixture::new("Name", "STRING(24)")),
        TableFixture::new("Albums")
            .interleave_in("Singers")
            .column(ColumnFixture::new("SingerId", "INT64").primary_key())
            .column(ColumnFixture::new("AlbumId", "INT64").primary_key())
            .column(ColumnFixture::new("Title", "STRING(64)")),
    ]));

    let mut config = Config::default();
    config.project = "smoke".into();
    config.instance = "smoke".into();
    config.database = "smoke".into();
    config.threads = 4;
    config.batch_size = 100;
    config.operations.total = operations;

    let registry = Arc::new(MetricsRegistry::new());
    let schema = Schema::load(connection.as_ref()).await?;

    let mut workload = CoreWorkload::new(WorkloadConfig {
        config: Arc::new(config),
        schema,
        connection: connection.clone(),
        cancel: CancellationToken::new(),
        registry: registry.clone(),
    });

    workload.load(vec!["Albums".to_string()]).await?;
    workload.stop();

    info!(
        singers = connection.row_count("Singers"),
        albums = connection.row_count("Albums"),
        "smoke load complete"
    );
    info!("\n{}", registry.summary());
    Ok(())
}
