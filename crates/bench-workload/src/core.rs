//! The core workload: planner and executor.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table as AsciiTable;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;
use tracing::info;

use bench_core::{Config, Connection};
use bench_generator::sample;
use bench_schema::Schema;

use crate::error::WorkloadError;
use crate::job::JobMetrics;
use crate::metrics::MetricsRegistry;
use crate::pool::{PipedPool, PipedPoolConfig, DEFAULT_BUFFER_LEN};
use crate::target::Target;
use crate::JobType;

/// Everything the workload needs, provided by the caller: no hidden
/// client or context state.
pub struct WorkloadConfig {
    pub config: Arc<Config>,
    pub schema: Schema,
    pub connection: Arc<dyn Connection>,
    pub cancel: CancellationToken,
    pub registry: Arc<MetricsRegistry>,
}

/// Plans targets and drives their jobs through a fixed worker pool.
///
/// Completed jobs flow from the pool's output into a collector task that
/// tracks the outstanding count and surfaces the first fatal error.
pub struct CoreWorkload {
    config: Arc<Config>,
    schema: Schema,
    connection: Arc<dyn Connection>,
    cancel: CancellationToken,
    metrics: JobMetrics,
    pool: PipedPool,
    plan: Vec<Target>,
    outstanding: Arc<AtomicI64>,
    done: Arc<Notify>,
    abort_rx: mpsc::Receiver<WorkloadError>,
}

impl CoreWorkload {
    pub fn new(cfg: WorkloadConfig) -> Self {
        let metrics = JobMetrics::register(&cfg.registry);
        let mut pool = PipedPool::new(PipedPoolConfig {
            workers: cfg.config.threads,
            input_buffer: DEFAULT_BUFFER_LEN,
            output_buffer: DEFAULT_BUFFER_LEN,
        });

        let (completed_tx, mut completed_rx) = mpsc::channel(DEFAULT_BUFFER_LEN);
        pool.bind(completed_tx);

        let outstanding = Arc::new(AtomicI64::new(0));
        let done = Arc::new(Notify::new());
        let (abort_tx, abort_rx) = mpsc::channel::<WorkloadError>(1);

        // Collector: account for each completed job, abort on the first
        // fatal one.
        {
            let outstanding = outstanding.clone();
            let done = done.clone();
            tokio::spawn(async move {
                while let Some(job) = completed_rx.recv().await {
                    if let Some(err) = job.fatal_error() {
                        let _ = abort_tx.send(WorkloadError::Fatal(err)).await;
                        return;
                    }
                    if outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
                        done.notify_one();
                    }
                }
            });
        }

        Self {
            config: cfg.config,
            schema: cfg.schema,
            connection: cfg.connection,
            cancel: cfg.cancel,
            metrics,
            pool,
            plan: Vec::new(),
            outstanding,
            done,
            abort_rx,
        }
    }

    /// Execute a LOAD phase against the given tables.
    pub async fn load(&mut self, tables: Vec<String>) -> Result<(), WorkloadError> {
        self.plan(JobType::Load, tables).await?;
        info!("\n{}", self.plan_summary());
        self.execute().await
    }

    /// Execute a RUN phase against one table. Interleaved tables must be
    /// addressed through their apex.
    pub async fn run(&mut self, table: &str) -> Result<(), WorkloadError> {
        let st = self
            .schema
            .get_table(table)
            .ok_or_else(|| WorkloadError::TableNotFound(table.to_string()))?;

        if st.is_interleaved() && !st.is_apex() {
            let apex = self
                .schema
                .tables()
                .apex_of(st)
                .map(|t| t.name().to_string())
                .unwrap_or_default();
            return Err(WorkloadError::NonApexRun(apex));
        }

        self.plan(JobType::Run, vec![table.to_string()]).await?;
        info!("\n{}", self.plan_summary());
        self.execute().await
    }

    /// Build the execution plan: expand interleaved LOAD targets to their
    /// full relation chain, resolve per-table operation counts, sample
    /// tables for RUN reads, and apply the multiplicative fan-out for
    /// interleaved LOAD children.
    pub async fn plan(
        &mut self,
        job_type: JobType,
        mut targets: Vec<String>,
    ) -> Result<(), WorkloadError> {
        let mut need_multiplication = false;

        // LOAD expands an interleaved target to its whole family, parents
        // first; RUN always addresses exactly one apex.
        if job_type == JobType::Load {
            let requested = targets;
            let mut expanded: Vec<String> = Vec::new();
            for name in &requested {
                let table = self
                    .schema
                    .get_table(name)
                    .ok_or_else(|| WorkloadError::TableNotFound(name.clone()))?;

                if table.is_interleaved() && !table.is_apex() {
                    need_multiplication = true;
                    for relative in self.schema.tables().relation_chain(table) {
                        if !expanded.contains(&relative) {
                            expanded.push(relative);
                        }
                    }
                } else if !expanded.contains(name) {
                    expanded.push(name.clone());
                }
            }
            targets = expanded;
        }

        let mut plan = Vec::with_capacity(targets.len());
        for name in &targets {
            let table = self
                .schema
                .get_table(name)
                .ok_or_else(|| WorkloadError::TableNotFound(name.clone()))?;

            let samples = if job_type == JobType::Run && self.config.operations.read > 0 {
                Some(
                    sample::sample_table(
                        self.config.operations.sample_size,
                        self.connection.as_ref(),
                        table,
                    )
                    .await?,
                )
            } else {
                None
            };

            let operations =
                self.operations_for(table.name(), table.is_interleaved(), table.is_apex());

            plan.push(Target {
                job_type,
                table: table.clone(),
                operations,
                config: self.config.clone(),
                connection: self.connection.clone(),
                cancel: self.cancel.clone(),
                samples,
                metrics: self.metrics.clone(),
            });
        }

        // In a LOAD of an interleaved family the per-child counts are
        // multipliers: each child's operations scale off the running
        // product down its chain.
        if job_type == JobType::Load && need_multiplication {
            let apex_names: Vec<String> = plan
                .iter()
                .filter(|t| t.table.is_interleaved() && t.table.is_apex())
                .map(|t| t.table_name().to_string())
                .collect();

            for apex_name in apex_names {
                let Some(apex) = self.schema.get_table(&apex_name) else {
                    continue;
                };
                let chain = self.schema.tables().relation_chain(apex);

                let mut running = plan
                    .iter()
                    .find(|t| t.table_name() == apex_name)
                    .map(|t| t.operations)
                    .unwrap_or_default();
                for relative in chain.iter().skip(1) {
                    if let Some(target) = plan.iter_mut().find(|t| t.table_name() == *relative) {
                        target.operations *= running;
                        running = target.operations;
                    }
                }
            }
        }

        self.plan = plan;
        Ok(())
    }

    /// Per-table operation count: an explicit per-table total wins,
    /// interleaved children default to the child multiplier, everything
    /// else gets the global total.
    fn operations_for(&self, table: &str, interleaved: bool, apex: bool) -> u64 {
        if let Some(total) = self
            .config
            .table(table)
            .and_then(|t| t.operations.as_ref())
            .map(|o| o.total)
        {
            return total;
        }

        if interleaved && !apex {
            bench_core::config::DEFAULT_TABLE_OPERATIONS
        } else {
            self.config.operations.total
        }
    }

    pub fn plan_targets(&self) -> &[Target] {
        &self.plan
    }

    /// Drive every planned job through the pool; the first fatal error or
    /// the execution deadline aborts the whole run.
    pub async fn execute(&mut self) -> Result<(), WorkloadError> {
        let threads = self.config.threads;
        let max_execution_time = self.config.max_execution_time;

        // The producer holds one outstanding slot until every job is
        // submitted, so the count cannot drain to zero early.
        self.outstanding.fetch_add(1, Ordering::AcqRel);

        // Jobs are minted up front: a planning problem surfaces here,
        // before anything hits the pool.
        let mut jobs = Vec::new();
        for target in &self.plan {
            for operations in bucket_operations(target.operations, threads) {
                if operations == 0 {
                    continue;
                }
                match target.new_job(operations) {
                    Ok(job) => jobs.push(job),
                    Err(err) => {
                        self.outstanding.fetch_sub(1, Ordering::AcqRel);
                        return Err(err);
                    }
                }
            }
        }

        {
            let outstanding = self.outstanding.clone();
            let done = self.done.clone();
            let submitter = self.pool.handle();
            tokio::spawn(async move {
                for job in jobs {
                    outstanding.fetch_add(1, Ordering::AcqRel);
                    if !submitter.submit(Box::new(job)).await {
                        return;
                    }
                }
                // Release the producer's slot.
                if outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
                    done.notify_one();
                }
            });
        }

        tokio::select! {
            _ = self.done.notified() => Ok(()),
            Some(err) = self.abort_rx.recv() => {
                self.cancel.cancel();
                Err(err)
            }
            _ = tokio::time::sleep(max_execution_time), if !max_execution_time.is_zero() => {
                self.cancel.cancel();
                Err(WorkloadError::Timeout)
            }
        }
    }

    /// Stop the worker pool. Idempotent.
    pub fn stop(&self) {
        self.pool.stop();
    }

    /// Render the plan as a table for the operator.
    pub fn plan_summary(&self) -> String {
        let mut table = AsciiTable::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Table", "Operations", "Read", "Write", "Phase"]);

        for target in &self.plan {
            let (read, write) = match target.job_type {
                JobType::Run => (
                    self.config.operations.read.to_string(),
                    self.config.operations.write.to_string(),
                ),
                JobType::Load => ("N/A".to_string(), "N/A".to_string()),
            };
            table.add_row(vec![
                target.table_name().to_string(),
                target.operations.to_string(),
                read,
                write,
                target.job_type.to_string(),
            ]);
        }

        table.to_string()
    }
}

/// Split `total` operations into `buckets` near-equal bucket sizes; the
/// first `total % buckets` buckets carry the extra unit.
pub fn bucket_operations(total: u64, buckets: usize) -> Vec<u64> {
    let k = buckets.max(1) as u64;
    let each = total / k;
    let overflow = total % k;

    (0..k)
        .map(|i| if i < overflow { each + 1 } else { each })
        .collect()
}
