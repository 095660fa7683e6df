//! Progress coalescing
//!
//! Buffers per-task progress snapshots and releases them as a single batch
//! at most once per flush interval. Uncapped per-chunk events would swamp
//! the host boundary at high throughput; one batch per interval bounds the
//! worst-case event rate regardless of task count.

use bgdl_types::ProgressEntry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default flush interval between batched progress events.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(170);

/// Buffers the latest snapshot per task between flushes.
///
/// Each `record` call overwrites the task's pending entry, so a batch
/// always carries the last reported snapshot, never an average. The flush
/// check is opportunistic: it runs on every incoming report rather than on
/// a dedicated timer, which keeps the max-one-batch-per-interval bound.
#[derive(Debug)]
pub struct ProgressCoalescer {
    pending: HashMap<String, ProgressEntry>,
    last_flush: Instant,
    interval: Duration,
}

impl ProgressCoalescer {
    pub fn new() -> Self {
        Self::with_interval(PROGRESS_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            last_flush: Instant::now(),
            interval,
        }
    }

    /// Buffer a snapshot; returns the drained batch when the interval has
    /// elapsed since the last flush, `None` otherwise.
    pub fn record(&mut self, entry: ProgressEntry) -> Option<Vec<ProgressEntry>> {
        self.pending.insert(entry.id.clone(), entry);

        if self.last_flush.elapsed() > self.interval {
            Some(self.flush())
        } else {
            None
        }
    }

    /// Drop a task's pending snapshot, used on terminal events so a purged
    /// task never resurfaces in a later batch.
    pub fn forget(&mut self, client_id: &str) {
        self.pending.remove(client_id);
    }

    /// Force-flush everything pending, ignoring the interval.
    pub fn drain(&mut self) -> Vec<ProgressEntry> {
        if self.pending.is_empty() {
            Vec::new()
        } else {
            self.flush()
        }
    }

    fn flush(&mut self) -> Vec<ProgressEntry> {
        self.last_flush = Instant::now();
        self.pending.drain().map(|(_, entry)| entry).collect()
    }
}

impl Default for ProgressCoalescer {
    fn default() -> Self {
        Self::new()
    }
}
