use super::types::{EventReceiver, Kvs};
use super::SLOW_QUERY;
use crate::error::SqlError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A receiver that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReceiver;

impl EventReceiver for NullReceiver {}

/// A receiver that counts what it sees.
#[derive(Debug, Default)]
pub struct StatsReceiver {
    spans_started: AtomicU64,
    spans_finished: AtomicU64,
    events: AtomicU64,
    errors: AtomicU64,
    slow_queries: AtomicU64,
    timings: AtomicU64,
    total_duration_nanos: AtomicU64,
    max_duration_nanos: AtomicU64,
    last_error: Mutex<Option<String>>,
}

/// Snapshot of a [`StatsReceiver`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStats {
    pub spans_started: u64,
    pub spans_finished: u64,
    pub events: u64,
    pub errors: u64,
    pub slow_queries: u64,
    pub timings: u64,
    pub total_duration: Duration,
    pub max_duration: Duration,
    /// Name of the most recent error event.
    pub last_error: Option<String>,
}

impl StatsReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current statistics.
    pub fn stats(&self) -> EventStats {
        EventStats {
            spans_started: self.spans_started.load(Ordering::Relaxed),
            spans_finished: self.spans_finished.load(Ordering::Relaxed),
            events: self.events.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            slow_queries: self.slow_queries.load(Ordering::Relaxed),
            timings: self.timings.load(Ordering::Relaxed),
            total_duration: Duration::from_nanos(self.total_duration_nanos.load(Ordering::Relaxed)),
            max_duration: Duration::from_nanos(self.max_duration_nanos.load(Ordering::Relaxed)),
            last_error: self.last_error().clone(),
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        for counter in [
            &self.spans_started,
            &self.spans_finished,
            &self.events,
            &self.errors,
            &self.slow_queries,
            &self.timings,
            &self.total_duration_nanos,
            &self.max_duration_nanos,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        *self.last_error() = None;
    }

    fn last_error(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventReceiver for StatsReceiver {
    fn event(&self, name: &str) {
        self.events.fetch_add(1, Ordering::Relaxed);
        if name == SLOW_QUERY {
            self.slow_queries.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn event_err(&self, name: &str, _err: &SqlError) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        *self.last_error() = Some(name.to_string());
    }

    fn timing(&self, _name: &str, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.timings.fetch_add(1, Ordering::Relaxed);

        let prev = self.total_duration_nanos.fetch_add(nanos, Ordering::Relaxed);
        if prev.checked_add(nanos).is_none() {
            // Saturate instead of wrapping.
            self.total_duration_nanos.store(u64::MAX, Ordering::Relaxed);
        }
        self.max_duration_nanos.fetch_max(nanos, Ordering::Relaxed);
    }

    fn span_start(&self, _name: &str, _sql: &str) {
        self.spans_started.fetch_add(1, Ordering::Relaxed);
    }

    fn span_finish(&self, _name: &str) {
        self.spans_finished.fetch_add(1, Ordering::Relaxed);
    }
}

/// A receiver that fans every event out to several receivers, in insertion order.
#[derive(Default)]
pub struct CompositeReceiver {
    receivers: Vec<Arc<dyn EventReceiver>>,
}

impl CompositeReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a receiver.
    #[allow(clippy::should_implement_trait)]
    pub fn add<E: EventReceiver + 'static>(mut self, receiver: E) -> Self {
        self.receivers.push(Arc::new(receiver));
        self
    }

    /// Add an Arc-wrapped receiver.
    pub fn add_arc(mut self, receiver: Arc<dyn EventReceiver>) -> Self {
        self.receivers.push(receiver);
        self
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }
}

impl EventReceiver for CompositeReceiver {
    fn event(&self, name: &str) {
        for r in &self.receivers {
            r.event(name);
        }
    }

    fn event_kv(&self, name: &str, kvs: &Kvs) {
        for r in &self.receivers {
            r.event_kv(name, kvs);
        }
    }

    fn event_err(&self, name: &str, err: &SqlError) {
        for r in &self.receivers {
            r.event_err(name, err);
        }
    }

    fn event_err_kv(&self, name: &str, err: &SqlError, kvs: &Kvs) {
        for r in &self.receivers {
            r.event_err_kv(name, err, kvs);
        }
    }

    fn timing(&self, name: &str, elapsed: Duration) {
        for r in &self.receivers {
            r.timing(name, elapsed);
        }
    }

    fn timing_kv(&self, name: &str, elapsed: Duration, kvs: &Kvs) {
        for r in &self.receivers {
            r.timing_kv(name, elapsed, kvs);
        }
    }

    fn span_start(&self, name: &str, sql: &str) {
        for r in &self.receivers {
            r.span_start(name, sql);
        }
    }

    fn span_finish(&self, name: &str) {
        for r in &self.receivers {
            r.span_finish(name);
        }
    }
}
