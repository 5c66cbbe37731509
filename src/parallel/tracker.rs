//! Progress tracking for the batch scheduler
//!
//! Counters are monitoring output only; no scheduling decision reads them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    total: AtomicUsize,
    finished: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Cheaply cloneable handle to shared progress counters
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    counters: Arc<Counters>,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        let tracker = Self::default();
        tracker.counters.total.store(total, Ordering::Relaxed);
        tracker
    }

    pub fn total(&self) -> usize {
        self.counters.total.load(Ordering::Relaxed)
    }

    /// A worker picked up a task
    pub fn task_started(&self) {
        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    /// A worker finished a task; returns files finished so far
    pub fn task_finished(&self) -> usize {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.file_finished()
    }

    /// A file reached a terminal state without running (skipped);
    /// returns files finished so far
    pub fn file_finished(&self) -> usize {
        self.counters.finished.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn finished(&self) -> usize {
        self.counters.finished.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::SeqCst)
    }
}
