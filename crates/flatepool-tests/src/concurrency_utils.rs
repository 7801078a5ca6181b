//! Scoped-thread harness for concurrency tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Counters shared by all workers of one run
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    operations_completed: AtomicUsize,
    bytes_processed: AtomicUsize,
    errors_encountered: AtomicUsize,
}

impl WorkerMetrics {
    /// Record one successful operation
    pub fn record_operation(&self, bytes: usize) {
        self.operations_completed.fetch_add(1, Ordering::Relaxed);
        self.bytes_processed.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record one failed operation
    pub fn record_error(&self) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
    }

    /// Successful operations so far
    pub fn operations(&self) -> usize {
        self.operations_completed.load(Ordering::Relaxed)
    }

    /// Bytes processed so far
    pub fn bytes(&self) -> usize {
        self.bytes_processed.load(Ordering::Relaxed)
    }

    /// Failed operations so far
    pub fn errors(&self) -> usize {
        self.errors_encountered.load(Ordering::Relaxed)
    }
}

/// Outcome of [`run_workers`]
#[derive(Debug)]
pub struct RunSummary {
    /// Number of worker threads
    pub workers: usize,
    /// Wall time of the whole run
    pub duration: Duration,
    /// Successful operations across all workers
    pub operations: usize,
    /// Bytes processed across all workers
    pub bytes: usize,
    /// Failed operations across all workers
    pub errors: usize,
}

/// Run `worker(index, metrics)` on `workers` scoped threads and wait for all
///
/// A panicking worker propagates its panic to the caller.
pub fn run_workers<F>(workers: usize, worker: F) -> RunSummary
where
    F: Fn(usize, &WorkerMetrics) + Sync,
{
    let metrics = WorkerMetrics::default();
    let start = Instant::now();

    thread::scope(|scope| {
        for index in 0..workers {
            let worker = &worker;
            let metrics = &metrics;
            scope.spawn(move || worker(index, metrics));
        }
    });

    RunSummary {
        workers,
        duration: start.elapsed(),
        operations: metrics.operations(),
        bytes: metrics.bytes(),
        errors: metrics.errors(),
    }
}
