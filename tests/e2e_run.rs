//! End-to-end RUN scenarios: read/write mixes, stale reads, cancellation
//! and timeouts, all against the in-process backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use bench_core::memory::{ColumnFixture, TableFixture};
use bench_core::{ClientError, Config, ErrorCode, MemoryConnection, TimestampBound};
use bench_schema::Schema;
use bench_workload::{CoreWorkload, MetricsRegistry, WorkloadConfig, WorkloadError};

fn music_fixtures() -> Vec<TableFixture> {
    vec![
        TableFixture::new("Singers")
            .column(ColumnFixture::new("SingerId", "INT64").primary_key())
            .column(ColumnFixture::new("Name", "STRING(24)")),
        TableFixture::new("Albums")
            .interleave_in("Singers")
            .column(ColumnFixture::new("SingerId", "INT64").primary_key())
            .column(ColumnFixture::new("AlbumId", "INT64").primary_key())
            .column(ColumnFixture::new("Title", "STRING(64)")),
    ]
}

async fn preload(conn: &Arc<MemoryConnection>, rows: u64) {
    let mut config = Config::default();
    config.threads = 4;
    config.operations.total = rows;
    config.batch_size = 100;

    let schema = Schema::load(conn.as_ref()).await.unwrap();
    let mut wl = CoreWorkload::new(WorkloadConfig {
        config: Arc::new(config),
        schema,
        connection: conn.clone(),
        cancel: CancellationToken::new(),
        registry: Arc::new(MetricsRegistry::new()),
    });
    wl.load(vec!["Singers".to_string()]).await.unwrap();
    wl.stop();
}

async fn run_workload(
    conn: Arc<MemoryConnection>,
    config: Config,
    cancel: CancellationToken,
    registry: Arc<MetricsRegistry>,
) -> (CoreWorkload, Result<(), WorkloadError>) {
    let schema = Schema::load(conn.as_ref()).await.unwrap();
    let mut wl = CoreWorkload::new(WorkloadConfig {
        config: Arc::new(config),
        schema,
        connection: conn,
        cancel,
        registry,
    });
    let result = wl.run("Singers").await;
    (wl, result)
}

#[tokio::test]
async fn mixed_run_splits_reads_and_writes_by_weight() {
    let conn = Arc::new(MemoryConnection::new(music_fixtures()));
    preload(&conn, 200).await;

    let mut config = Config::default();
    config.threads = 4;
    config.operations.total = 10_000;
    config.operations.read = 50;
    config.operations.write = 50;

    let registry = Arc::new(MetricsRegistry::new());
    let (wl, result) = run_workload(
        conn.clone(),
        config,
        CancellationToken::new(),
        registry.clone(),
    )
    .await;
    result.unwrap();
    wl.stop();

    let reads = registry.meter("operations.read.rate").count();
    let writes = registry.meter("operations.write.rate").count();
    assert_eq!(reads + writes, 10_000);
    // Each side within 5% of its expected 5000.
    assert!((4_750..=5_250).contains(&reads), "reads: {reads}");
    assert!((4_750..=5_250).contains(&writes), "writes: {writes}");

    // Point reads used strong bounds and sampled keys.
    let recorded = conn.reads();
    assert_eq!(recorded.len() as u64, reads);
    assert!(recorded
        .iter()
        .all(|r| r.bound == TimestampBound::Strong && r.table == "Singers"));
}

#[tokio::test]
async fn zero_read_weight_needs_no_read_generator() {
    let conn = Arc::new(MemoryConnection::new(music_fixtures()));

    let mut config = Config::default();
    config.threads = 2;
    config.operations.total = 100;
    config.operations.read = 0;
    config.operations.write = 100;

    let registry = Arc::new(MetricsRegistry::new());
    let (wl, result) = run_workload(
        conn.clone(),
        config,
        CancellationToken::new(),
        registry.clone(),
    )
    .await;
    result.unwrap();
    wl.stop();

    assert_eq!(registry.meter("operations.read.rate").count(), 0);
    assert_eq!(registry.meter("operations.write.rate").count(), 100);
    assert!(conn.reads().is_empty());
}

#[tokio::test]
async fn stale_runs_bind_every_read_to_the_staleness() {
    let conn = Arc::new(MemoryConnection::new(music_fixtures()));
    preload(&conn, 100).await;

    let mut config = Config::default();
    config.threads = 2;
    config.operations.total = 200;
    config.operations.read_stale = true;
    config.operations.staleness = Duration::from_secs(15);

    let registry = Arc::new(MetricsRegistry::new());
    let (wl, result) = run_workload(
        conn.clone(),
        config,
        CancellationToken::new(),
        registry.clone(),
    )
    .await;
    result.unwrap();
    wl.stop();

    let recorded = conn.reads();
    assert!(!recorded.is_empty());
    assert!(recorded
        .iter()
        .all(|r| r.bound == TimestampBound::ExactStaleness(Duration::from_secs(15))));
}

#[tokio::test]
async fn running_a_non_apex_table_is_refused() {
    let conn = Arc::new(MemoryConnection::new(music_fixtures()));
    let registry = Arc::new(MetricsRegistry::new());

    let schema = Schema::load(conn.as_ref()).await.unwrap();
    let mut wl = CoreWorkload::new(WorkloadConfig {
        config: Arc::new(Config::default()),
        schema,
        connection: conn,
        cancel: CancellationToken::new(),
        registry,
    });

    match wl.run("Albums").await {
        Err(WorkloadError::NonApexRun(apex)) => assert_eq!(apex, "Singers"),
        other => panic!("expected NonApexRun, got {other:?}"),
    }
    wl.stop();
}

#[tokio::test]
async fn cancellation_aborts_with_a_fatal_canceled_error() {
    let conn = Arc::new(MemoryConnection::new(music_fixtures()));
    conn.set_latency(Some(Duration::from_millis(2)));

    let mut config = Config::default();
    config.threads = 4;
    config.operations.total = 100_000;
    config.operations.read = 0;
    config.operations.write = 100;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            cancel.cancel();
        });
    }

    let registry = Arc::new(MetricsRegistry::new());
    let started = Instant::now();
    let (wl, result) = run_workload(conn, config, cancel, registry).await;
    match result {
        Err(WorkloadError::Fatal(ClientError { code, .. })) => {
            assert_eq!(code, ErrorCode::Canceled);
        }
        other => panic!("expected fatal Canceled, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
    wl.stop();
}

#[tokio::test]
async fn the_execution_deadline_aborts_the_run() {
    let conn = Arc::new(MemoryConnection::new(music_fixtures()));
    conn.set_latency(Some(Duration::from_millis(5)));

    let mut config = Config::default();
    config.threads = 2;
    config.operations.total = 1_000_000;
    config.operations.read = 0;
    config.operations.write = 100;
    config.max_execution_time = Duration::from_millis(200);

    let registry = Arc::new(MetricsRegistry::new());
    let started = Instant::now();
    let (wl, result) = run_workload(conn, config, CancellationToken::new(), registry).await;
    assert!(matches!(result, Err(WorkloadError::Timeout)));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(200), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(10), "elapsed: {elapsed:?}");
    wl.stop();
}

#[tokio::test]
async fn unauthenticated_errors_abort_the_whole_run() {
    let conn = Arc::new(MemoryConnection::new(music_fixtures()));
    preload(&conn, 50).await;

    let mut config = Config::default();
    config.threads = 2;
    config.operations.total = 10_000;
    config.operations.read = 0;
    config.operations.write = 100;

    // Let schema discovery succeed, then fail every data-path call.
    let schema = Schema::load(conn.as_ref()).await.unwrap();
    conn.set_failure(Some(ClientError::new(
        ErrorCode::Unauthenticated,
        "token expired",
    )));

    let mut wl = CoreWorkload::new(WorkloadConfig {
        config: Arc::new(config),
        schema,
        connection: conn,
        cancel: CancellationToken::new(),
        registry: Arc::new(MetricsRegistry::new()),
    });

    match wl.run("Singers").await {
        Err(WorkloadError::Fatal(ClientError { code, .. })) => {
            assert_eq!(code, ErrorCode::Unauthenticated);
        }
        other => panic!("expected fatal Unauthenticated, got {other:?}"),
    }
    wl.stop();
}
