//! One executable unit of a target's operations.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use bench_core::{
    ClientError, Connection, ErrorCode, Mutation, TimestampBound, Value,
};
use bench_generator::{GeneratorMap, Operation, SampleGenerator, WeightedRandom};

use crate::metrics::{Meter, MetricsRegistry, Timer};
use crate::pool::Job;
use crate::JobType;

/// Batch size used when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// The shared instrument handles every job reports into.
#[derive(Clone)]
pub struct JobMetrics {
    pub write_generation: Arc<Timer>,
    pub read_generation: Arc<Timer>,
    pub write_time: Arc<Timer>,
    pub write_rate: Arc<Meter>,
    pub read_time: Arc<Timer>,
    pub read_rate: Arc<Meter>,
    pub errors: Arc<Meter>,
}

impl JobMetrics {
    pub fn register(registry: &MetricsRegistry) -> Self {
        Self {
            write_generation: registry.timer("operations.write.data"),
            read_generation: registry.timer("operations.read.data"),
            write_time: registry.timer("operations.write.time"),
            write_rate: registry.meter("operations.write.rate"),
            read_time: registry.timer("operations.read.time"),
            read_rate: registry.meter("operations.read.rate"),
            errors: registry.meter("errors"),
        }
    }
}

/// A bucketed slice of one target's operations, executed sequentially by
/// a single worker.
///
/// Generator and selector instances are owned by the job; they hold RNG
/// state and must not be shared across workers.
pub struct WorkloadJob {
    pub job_type: JobType,
    pub connection: Arc<dyn Connection>,
    pub cancel: CancellationToken,
    pub table: String,
    pub operations: u64,
    pub batched: bool,
    pub batch_size: usize,
    pub columns: Vec<String>,
    pub stale_reads: bool,
    pub staleness: Duration,
    pub selector: Option<WeightedRandom<Operation>>,
    pub write_generator: GeneratorMap,
    pub read_generator: Option<SampleGenerator>,
    pub metrics: JobMetrics,
    /// Set on the first unrecoverable driver error; the workload aborts.
    pub fatal: Option<ClientError>,
}

impl WorkloadJob {
    async fn run_load(&mut self) {
        if self.batched {
            let _ = self.insert_batch().await;
        } else {
            for _ in 0..self.operations {
                if self.insert_one().await.is_err() {
                    return;
                }
            }
        }
    }

    async fn run_mixed(&mut self) {
        for _ in 0..self.operations {
            let operation = match self.selector.as_mut() {
                Some(selector) => *selector.select(),
                None => Operation::Write,
            };
            let result = match operation {
                Operation::Read => self.read_one().await,
                Operation::Write => self.insert_one().await,
            };
            if result.is_err() {
                return;
            }
        }
    }

    async fn insert_one(&mut self) -> Result<(), ClientError> {
        self.check_cancelled()?;
        let row = self.generate_row();
        self.apply(vec![Mutation::insert(self.table.clone(), row)])
            .await
    }

    async fn insert_batch(&mut self) -> Result<(), ClientError> {
        let batch_size = if self.batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            self.batch_size
        };

        let mut buffer: Vec<Mutation> = Vec::with_capacity(batch_size);
        for _ in 0..self.operations {
            self.check_cancelled()?;
            let row = self.generate_row();
            buffer.push(Mutation::insert(self.table.clone(), row));

            if buffer.len() >= batch_size {
                let batch = std::mem::replace(&mut buffer, Vec::with_capacity(batch_size));
                self.apply(batch).await?;
            }
        }

        // Flush the partial batch at the end.
        if !buffer.is_empty() {
            self.apply(buffer).await?;
        }
        Ok(())
    }

    async fn read_one(&mut self) -> Result<(), ClientError> {
        self.check_cancelled()?;

        let Some(read_generator) = self.read_generator.as_mut() else {
            return Ok(());
        };
        let start = Instant::now();
        let key = read_generator.next_key();
        self.metrics.read_generation.record(start.elapsed());

        let bound = if self.stale_reads {
            TimestampBound::ExactStaleness(self.staleness)
        } else {
            TimestampBound::Strong
        };

        let start = Instant::now();
        let result = self
            .connection
            .read_row(bound, &self.table, &key, &self.columns)
            .await;
        self.metrics.read_time.record(start.elapsed());
        self.metrics.read_rate.mark(1);

        match result {
            Ok(_) => Ok(()),
            Err(err) => self.check_error(err),
        }
    }

    fn generate_row(&mut self) -> Vec<(String, Value)> {
        let start = Instant::now();
        let row = self
            .write_generator
            .iter_mut()
            .map(|(column, generator)| (column.clone(), generator.next_value()))
            .collect();
        self.metrics.write_generation.record(start.elapsed());
        row
    }

    async fn apply(&mut self, mutations: Vec<Mutation>) -> Result<(), ClientError> {
        let count = mutations.len() as u64;
        let start = Instant::now();
        let result = self.connection.apply(mutations).await;
        self.metrics.write_time.record(start.elapsed());
        self.metrics.write_rate.mark(count);

        match result {
            Ok(()) => Ok(()),
            Err(err) => self.check_error(err),
        }
    }

    /// Fatal errors stop the job (and through it, the workload); anything
    /// else is counted and skipped. Retrying is the driver's business.
    fn check_error(&mut self, err: ClientError) -> Result<(), ClientError> {
        if err.is_fatal() {
            self.fatal = Some(err.clone());
            return Err(err);
        }
        debug!(error = %err, table = %self.table, "transient driver error");
        self.metrics.errors.mark(1);
        Ok(())
    }

    fn check_cancelled(&mut self) -> Result<(), ClientError> {
        if self.cancel.is_cancelled() {
            let err = ClientError::new(ErrorCode::Canceled, "operation canceled");
            self.fatal = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl Job for WorkloadJob {
    async fn execute(&mut self) {
        match self.job_type {
            JobType::Load => self.run_load().await,
            JobType::Run => self.run_mixed().await,
        }
    }

    fn fatal_error(&self) -> Option<ClientError> {
        self.fatal.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::memory::{ColumnFixture, TableFixture};
    use bench_core::MemoryConnection;
    use bench_generator::factory;
    use bench_schema::Schema;

    async fn load_schema(conn: &MemoryConnection) -> Schema {
        Schema::load(conn).await.unwrap()
    }

    fn fixtures() -> Vec<TableFixture> {
        vec![TableFixture::new("Singers")
            .column(ColumnFixture::new("SingerId", "INT64").primary_key())
            .column(ColumnFixture::new("Name", "STRING(24)"))]
    }

    async fn load_job(conn: Arc<MemoryConnection>, operations: u64, batched: bool) -> WorkloadJob {
        let schema = load_schema(&conn).await;
        let table = schema.get_table("Singers").unwrap();
        let config = bench_core::Config::default();
        let registry = MetricsRegistry::new();

        WorkloadJob {
            job_type: JobType::Load,
            connection: conn,
            cancel: CancellationToken::new(),
            table: "Singers".to_string(),
            operations,
            batched,
            batch_size: 100,
            columns: table.column_names(),
            stale_reads: false,
            staleness: Duration::from_secs(15),
            selector: None,
            write_generator: factory::generator_map_for_table(&config, table).unwrap(),
            read_generator: None,
            metrics: JobMetrics::register(&registry),
            fatal: None,
        }
    }

    #[tokio::test]
    async fn batched_load_inserts_exactly_the_operation_count() {
        let conn = Arc::new(MemoryConnection::new(fixtures()));
        let mut job = load_job(conn.clone(), 250, true).await;
        job.execute().await;

        assert_eq!(conn.row_count("Singers"), 250);
        // 250 operations with batch size 100: two full batches and a flush.
        assert_eq!(conn.batch_sizes(), vec![100, 100, 50]);
        assert!(job.fatal_error().is_none());
        assert_eq!(job.metrics.write_rate.count(), 250);
    }

    #[tokio::test]
    async fn unbatched_load_applies_one_row_per_call() {
        let conn = Arc::new(MemoryConnection::new(fixtures()));
        let mut job = load_job(conn.clone(), 7, false).await;
        job.execute().await;

        assert_eq!(conn.row_count("Singers"), 7);
        assert_eq!(conn.batch_sizes(), vec![1, 1, 1, 1, 1, 1, 1]);
    }

    #[tokio::test]
    async fn fatal_errors_halt_the_job() {
        let conn = Arc::new(MemoryConnection::new(fixtures()));
        conn.set_failure(Some(ClientError::new(
            ErrorCode::Unauthenticated,
            "token expired",
        )));
        let mut job = load_job(conn.clone(), 1_000, true).await;
        job.execute().await;

        let fatal = job.fatal_error().expect("fatal error expected");
        assert_eq!(fatal.code, ErrorCode::Unauthenticated);
        // Exactly one apply was attempted.
        assert_eq!(conn.batch_sizes().len(), 1);
    }

    #[tokio::test]
    async fn transient_errors_are_counted_not_fatal() {
        let conn = Arc::new(MemoryConnection::new(fixtures()));
        conn.set_failure(Some(ClientError::new(ErrorCode::Unavailable, "flaky")));
        let mut job = load_job(conn.clone(), 300, true).await;
        job.execute().await;

        assert!(job.fatal_error().is_none());
        assert_eq!(job.metrics.errors.count(), 3);
    }

    #[tokio::test]
    async fn cancellation_is_fatal_before_the_next_operation() {
        let conn = Arc::new(MemoryConnection::new(fixtures()));
        let mut job = load_job(conn.clone(), 1_000, true).await;
        job.cancel.cancel();
        job.execute().await;

        let fatal = job.fatal_error().expect("fatal error expected");
        assert_eq!(fatal.code, ErrorCode::Canceled);
        assert_eq!(conn.row_count("Singers"), 0);
    }
}
