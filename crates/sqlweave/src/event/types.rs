use crate::error::SqlError;
use std::collections::BTreeMap;
use std::time::Duration;

/// Structured key/value fields attached to an event (`sql`, `args`, `rows`, ...).
pub type Kvs = BTreeMap<String, String>;

/// Receiver of execution events.
///
/// Every method has a no-op default, so implementations override only what they need. The
/// `_kv` variants fall back to their plain counterparts.
pub trait EventReceiver: Send + Sync {
    /// A named event happened.
    fn event(&self, name: &str) {
        let _ = name;
    }

    /// A named event with fields.
    fn event_kv(&self, name: &str, kvs: &Kvs) {
        let _ = kvs;
        self.event(name);
    }

    /// A named stage failed.
    fn event_err(&self, name: &str, err: &SqlError) {
        let _ = (name, err);
    }

    /// A named stage failed, with fields.
    fn event_err_kv(&self, name: &str, err: &SqlError, kvs: &Kvs) {
        let _ = kvs;
        self.event_err(name, err);
    }

    /// A named operation took `elapsed`.
    fn timing(&self, name: &str, elapsed: Duration) {
        let _ = (name, elapsed);
    }

    /// A named operation took `elapsed`, with fields.
    fn timing_kv(&self, name: &str, elapsed: Duration, kvs: &Kvs) {
        let _ = kvs;
        self.timing(name, elapsed);
    }

    /// A run of `sql` is about to start.
    fn span_start(&self, name: &str, sql: &str) {
        let _ = (name, sql);
    }

    /// The run started by the matching `span_start` finished, successfully or not.
    fn span_finish(&self, name: &str) {
        let _ = name;
    }
}
