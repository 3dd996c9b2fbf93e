//! Fixed-size worker pools with a channel-of-channels dispatch protocol.
//!
//! Idle workers publish their personal job channel on a shared
//! availability channel; the dispatcher pairs each incoming job with the
//! next available worker. The piped flavor additionally forwards every
//! completed job to an output channel, which can be bound to a downstream
//! consumer. `stop` is idempotent and never blocks: shutdown is a
//! cancellation token every task watches, so a bound forwarder can never
//! deadlock a late `stop`.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use bench_core::ClientError;

/// Default bound for the piped pool's input and output channels.
pub const DEFAULT_BUFFER_LEN: usize = 5000;

/// A unit of work executed by one worker.
#[async_trait]
pub trait Job: Send + 'static {
    async fn execute(&mut self);

    /// A fatal error captured during execution, if any. The pool's
    /// consumer uses this to abort the whole workload.
    fn fatal_error(&self) -> Option<ClientError> {
        None
    }
}

pub type BoxedJob = Box<dyn Job>;

type JobSender = mpsc::Sender<BoxedJob>;

/// Configuration for [`PipedPool`].
#[derive(Debug, Clone)]
pub struct PipedPoolConfig {
    pub workers: usize,
    pub input_buffer: usize,
    pub output_buffer: usize,
}

impl Default for PipedPoolConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            input_buffer: DEFAULT_BUFFER_LEN,
            output_buffer: DEFAULT_BUFFER_LEN,
        }
    }
}

/// Worker pool whose completed jobs flow to an output channel.
pub struct PipedPool {
    input: JobSender,
    output: Option<mpsc::Receiver<BoxedJob>>,
    shutdown: CancellationToken,
}

impl PipedPool {
    pub fn new(config: PipedPoolConfig) -> Self {
        let shutdown = CancellationToken::new();
        let (input_tx, input_rx) = mpsc::channel(config.input_buffer.max(1));
        let (output_tx, output_rx) = mpsc::channel(config.output_buffer.max(1));

        spawn_workers(
            config.workers,
            input_rx,
            Some(output_tx),
            shutdown.clone(),
        );

        Self {
            input: input_tx,
            output: Some(output_rx),
            shutdown,
        }
    }

    /// Forward every completed job to `downstream` until the pool stops.
    ///
    /// May be called once; later calls are no-ops.
    pub fn bind(&mut self, downstream: JobSender) {
        let Some(mut output) = self.output.take() else {
            return;
        };
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    job = output.recv() => {
                        let Some(job) = job else { return };
                        if downstream.send(job).await.is_err() {
                            return;
                        }
                    }
                }
            }
        });
    }

    /// Submit a job, blocking under backpressure. Returns `false` when the
    /// pool has stopped.
    pub async fn submit(&self, job: BoxedJob) -> bool {
        self.input.send(job).await.is_ok()
    }

    /// A cloneable submission handle for producer tasks.
    pub fn handle(&self) -> PoolHandle {
        PoolHandle {
            input: self.input.clone(),
        }
    }

    /// Stop dispatcher, workers and any bound forwarder. Idempotent.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

/// Submits jobs into a pool from outside the owning struct.
#[derive(Clone)]
pub struct PoolHandle {
    input: JobSender,
}

impl PoolHandle {
    pub async fn submit(&self, job: BoxedJob) -> bool {
        self.input.send(job).await.is_ok()
    }
}

impl Drop for PipedPool {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Worker pool without an output side.
pub struct Pool {
    input: JobSender,
    shutdown: CancellationToken,
}

impl Pool {
    pub fn new(workers: usize, input_buffer: usize) -> Self {
        let shutdown = CancellationToken::new();
        let (input_tx, input_rx) = mpsc::channel(input_buffer.max(1));
        spawn_workers(workers, input_rx, None, shutdown.clone());
        Self {
            input: input_tx,
            shutdown,
        }
    }

    pub async fn submit(&self, job: BoxedJob) -> bool {
        self.input.send(job).await.is_ok()
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn spawn_workers(
    workers: usize,
    input: mpsc::Receiver<BoxedJob>,
    output: Option<JobSender>,
    shutdown: CancellationToken,
) {
    let (availability_tx, availability_rx) = mpsc::channel(workers.max(1));

    for _ in 0..workers {
        let (job_tx, job_rx) = mpsc::channel(1);
        tokio::spawn(worker_loop(
            job_tx,
            job_rx,
            availability_tx.clone(),
            output.clone(),
            shutdown.clone(),
        ));
    }

    tokio::spawn(dispatch(input, availability_rx, shutdown));
}

/// Pair each incoming job with the next worker that published its channel.
async fn dispatch(
    mut input: mpsc::Receiver<BoxedJob>,
    mut availability: mpsc::Receiver<JobSender>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            job = input.recv() => {
                let Some(job) = job else { return };
                tokio::select! {
                    _ = shutdown.cancelled() => return,
                    worker = availability.recv() => {
                        let Some(worker) = worker else { return };
                        let _ = worker.send(job).await;
                    }
                }
            }
        }
    }
}

async fn worker_loop(
    job_tx: JobSender,
    mut job_rx: mpsc::Receiver<BoxedJob>,
    availability: mpsc::Sender<JobSender>,
    output: Option<JobSender>,
    shutdown: CancellationToken,
) {
    loop {
        // Publish our channel, then wait for work or shutdown.
        if availability.send(job_tx.clone()).await.is_err() {
            return;
        }
        tokio::select! {
            _ = shutdown.cancelled() => return,
            job = job_rx.recv() => {
                let Some(mut job) = job else { return };
                job.execute().await;
                if let Some(output) = &output {
                    if output.send(job).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingJob {
        counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Job for CountingJob {
        async fn execute(&mut self) {
            self.counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn plain_pool_executes_every_job() {
        let pool = Pool::new(4, 16);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let job = Box::new(CountingJob {
                counter: counter.clone(),
            });
            assert!(pool.submit(job).await);
        }

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while counter.load(Ordering::SeqCst) < 100 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("jobs should all run");

        pool.stop();
        pool.stop(); // idempotent
    }

    #[tokio::test]
    async fn piped_pool_forwards_completed_jobs() {
        let mut pool = PipedPool::new(PipedPoolConfig {
            workers: 2,
            ..Default::default()
        });
        let (done_tx, mut done_rx) = mpsc::channel(16);
        pool.bind(done_tx);

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let job = Box::new(CountingJob {
                counter: counter.clone(),
            });
            assert!(pool.submit(job).await);
        }

        for _ in 0..10 {
            let job = tokio::time::timeout(std::time::Duration::from_secs(5), done_rx.recv())
                .await
                .expect("completed job should arrive")
                .expect("channel open");
            assert!(job.fatal_error().is_none());
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);

        pool.stop();
    }

    #[tokio::test]
    async fn stopped_pool_rejects_submissions() {
        let pool = Pool::new(1, 1);
        pool.stop();
        // Give the dispatcher a moment to observe the cancellation.
        tokio::task::yield_now().await;
        let counter = Arc::new(AtomicUsize::new(0));
        let job = Box::new(CountingJob { counter });
        // The send may still be accepted by the buffered channel, but the
        // pool never executes anything after stop; drain the race by
        // asserting it does not block.
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            pool.submit(job),
        )
        .await;
    }
}
