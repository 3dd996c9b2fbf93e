//! Per-table execution bundle.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;

use bench_core::{Config, Connection};
use bench_generator::sample::SampleSet;
use bench_generator::{factory, operation, SampleGenerator};
use bench_schema::Table;

use crate::error::WorkloadError;
use crate::job::{JobMetrics, WorkloadJob};
use crate::JobType;

/// One planned table: its operation count plus everything needed to mint
/// jobs against it.
///
/// Generators and the operation selector hold RNG state, so each job gets
/// freshly built instances rather than shared ones.
#[derive(Clone)]
pub struct Target {
    pub job_type: JobType,
    pub table: Table,
    pub operations: u64,
    pub config: Arc<Config>,
    pub connection: Arc<dyn Connection>,
    pub cancel: CancellationToken,
    /// Sampled primary keys for point reads; present only for RUN targets
    /// with a positive read weight.
    pub samples: Option<SampleSet>,
    pub metrics: JobMetrics,
}

impl Target {
    pub fn table_name(&self) -> &str {
        self.table.name()
    }

    /// Mint a job carrying `operations` operations of this target.
    pub fn new_job(&self, operations: u64) -> Result<WorkloadJob, WorkloadError> {
        let write_generator = factory::generator_map_for_table(&self.config, &self.table)?;

        let selector = match self.job_type {
            JobType::Run => Some(operation::operation_selector(
                self.config.operations.read,
                self.config.operations.write,
            )?),
            JobType::Load => None,
        };

        let read_generator = match &self.samples {
            Some(samples) => Some(SampleGenerator::new(
                StdRng::from_entropy(),
                samples.clone(),
            )?),
            None => None,
        };

        Ok(WorkloadJob {
            job_type: self.job_type,
            connection: self.connection.clone(),
            cancel: self.cancel.clone(),
            table: self.table.name().to_string(),
            operations,
            batched: self.config.batch,
            batch_size: self.config.batch_size,
            columns: self.table.column_names(),
            stale_reads: self.config.operations.read_stale,
            staleness: self.config.operations.staleness,
            selector,
            write_generator,
            read_generator,
            metrics: self.metrics.clone(),
            fatal: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsRegistry;
    use bench_core::memory::{ColumnFixture, TableFixture};
    use bench_core::MemoryConnection;
    use bench_schema::Schema;

    #[tokio::test]
    async fn jobs_get_independent_generator_maps() {
        let conn = Arc::new(MemoryConnection::new(vec![TableFixture::new("Singers")
            .column(ColumnFixture::new("SingerId", "INT64").primary_key())
            .column(ColumnFixture::new("Name", "STRING(16)"))]));
        let schema = Schema::load(conn.as_ref()).await.unwrap();
        let registry = MetricsRegistry::new();

        let target = Target {
            job_type: JobType::Load,
            table: schema.get_table("Singers").unwrap().clone(),
            operations: 100,
            config: Arc::new(Config::default()),
            connection: conn,
            cancel: CancellationToken::new(),
            samples: None,
            metrics: JobMetrics::register(&registry),
        };

        let a = target.new_job(10).unwrap();
        let b = target.new_job(20).unwrap();
        assert_eq!(a.operations, 10);
        assert_eq!(b.operations, 20);
        assert_eq!(a.write_generator.len(), 2);
        assert_eq!(b.write_generator.len(), 2);
    }
}
