//! Observability hooks around statement execution.
//!
//! A [`Session`](crate::Session) reports every run to an [`EventReceiver`]:
//! - a span (`span_start`/`span_finish`) and a timing around the runner call
//! - named error events for each failing stage
//! - a `sqlweave.slow_query` event when the configured threshold is exceeded
//!
//! Receivers are observational only; nothing they do changes the result of a run.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlweave::event::{CompositeReceiver, StatsReceiver, TracingReceiver};
//! use std::sync::Arc;
//!
//! let stats = Arc::new(StatsReceiver::new());
//! let receiver = CompositeReceiver::new()
//!     .add(TracingReceiver::new())
//!     .add_arc(stats.clone());
//!
//! let session = Session::new(client, sqlweave::dialect::POSTGRES).with_receiver(receiver);
//! // ... run statements ...
//! println!("{:?}", stats.stats());
//! ```

mod receivers;
mod types;

#[cfg(feature = "tracing")]
mod tracing_receiver;


pub use receivers::{CompositeReceiver, EventStats, NullReceiver, StatsReceiver};
pub use types::{EventReceiver, Kvs};

#[cfg(feature = "tracing")]
pub use tracing_receiver::TracingReceiver;

/// Span and timing name for [`crate::Session::exec`].
pub const EXEC: &str = "sqlweave.exec";
/// Span and timing name for the load family.
pub const SELECT: &str = "sqlweave.select";
/// Building or placeholder rewriting failed before an exec.
pub const EXEC_INTERPOLATE: &str = "sqlweave.exec.interpolate";
/// The runner rejected an exec.
pub const EXEC_EXEC: &str = "sqlweave.exec.exec";
/// Building or placeholder rewriting failed before a load.
pub const SELECT_INTERPOLATE: &str = "sqlweave.select.interpolate";
/// The runner rejected a load query.
pub const SELECT_LOAD_QUERY: &str = "sqlweave.select.load.query";
/// Decoding rows into the destination failed.
pub const SELECT_LOAD_SCAN: &str = "sqlweave.select.load.scan";
/// A run took longer than the slow query threshold.
pub const SLOW_QUERY: &str = "sqlweave.slow_query";

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
