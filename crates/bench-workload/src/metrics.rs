//! Shared, thread-safe meters and timers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use comfy_table::presets::UTF8_FULL;
use comfy_table::Table as AsciiTable;

/// A monotonically increasing event counter.
#[derive(Debug, Default)]
pub struct Meter {
    count: AtomicU64,
}

impl Meter {
    pub fn mark(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Latency accumulator: count, total, min and max.
#[derive(Debug)]
pub struct Timer {
    count: AtomicU64,
    total_nanos: AtomicU64,
    min_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            min_nanos: AtomicU64::new(u64::MAX),
            max_nanos: AtomicU64::new(0),
        }
    }
}

impl Timer {
    pub fn record(&self, elapsed: Duration) {
        let nanos = elapsed.as_nanos() as u64;
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.min_nanos.fetch_min(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
    }

    /// Time a synchronous closure.
    pub fn time<R>(&self, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = f();
        self.record(start.elapsed());
        result
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed))
    }

    pub fn min(&self) -> Duration {
        match self.min_nanos.load(Ordering::Relaxed) {
            u64::MAX => Duration::ZERO,
            nanos => Duration::from_nanos(nanos),
        }
    }

    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed))
    }

    pub fn mean(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed) / count)
    }
}

/// Named registry of meters and timers shared across workers.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    meters: Mutex<BTreeMap<String, Arc<Meter>>>,
    timers: Mutex<BTreeMap<String, Arc<Timer>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meter(&self, name: &str) -> Arc<Meter> {
        self.meters
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    pub fn timer(&self, name: &str) -> Arc<Timer> {
        self.timers
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Render every registered metric as a table for the run summary.
    pub fn summary(&self) -> String {
        let mut table = AsciiTable::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Metric", "Count", "Min", "Mean", "Max", "Total"]);

        for (name, timer) in self.timers.lock().unwrap().iter() {
            table.add_row(vec![
                name.clone(),
                timer.count().to_string(),
                format!("{:?}", timer.min()),
                format!("{:?}", timer.mean()),
                format!("{:?}", timer.max()),
                format!("{:?}", timer.total()),
            ]);
        }
        for (name, meter) in self.meters.lock().unwrap().iter() {
            table.add_row(vec![
                name.clone(),
                meter.count().to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }

        table.to_string()
    }
}
