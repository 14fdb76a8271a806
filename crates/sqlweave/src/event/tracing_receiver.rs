use super::types::{EventReceiver, Kvs};
use super::{SLOW_QUERY, truncate_sql_bytes};
use crate::error::SqlError;
use std::time::Duration;
use tracing::Level;

/// A `tracing`-based receiver.
///
/// Span starts are emitted at `level` with the SQL about to run, error and slow-query events
/// at WARN, timings at TRACE. Everything goes to the `sqlweave.sql` target.
///
/// Enable via the crate feature: `sqlweave = { features = ["tracing"] }`.
#[derive(Debug, Clone)]
pub struct TracingReceiver {
    /// Tracing event level for span starts and plain events.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingReceiver {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

impl TracingReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn truncated_kvs(&self, kvs: &Kvs) -> Kvs {
        kvs.iter()
            .map(|(k, v)| {
                let v = if k == "sql" { self.truncate_sql(v) } else { v.clone() };
                (k.clone(), v)
            })
            .collect()
    }
}

impl EventReceiver for TracingReceiver {
    fn event(&self, name: &str) {
        if name == SLOW_QUERY {
            tracing::warn!(target: "sqlweave.sql", event = name);
        } else {
            emit_at_level!(self.level, target: "sqlweave.sql", event = name);
        }
    }

    fn event_kv(&self, name: &str, kvs: &Kvs) {
        let fields = tracing::field::debug(self.truncated_kvs(kvs));
        if name == SLOW_QUERY {
            tracing::warn!(target: "sqlweave.sql", event = name, fields = fields);
        } else {
            emit_at_level!(self.level, target: "sqlweave.sql", event = name, fields = fields);
        }
    }

    fn event_err(&self, name: &str, err: &SqlError) {
        tracing::warn!(target: "sqlweave.sql", event = name, error = %err);
    }

    fn event_err_kv(&self, name: &str, err: &SqlError, kvs: &Kvs) {
        let fields = tracing::field::debug(self.truncated_kvs(kvs));
        tracing::warn!(target: "sqlweave.sql", event = name, error = %err, fields = fields);
    }

    fn timing(&self, name: &str, elapsed: Duration) {
        tracing::trace!(target: "sqlweave.sql", event = name, elapsed = ?elapsed);
    }

    fn timing_kv(&self, name: &str, elapsed: Duration, kvs: &Kvs) {
        let fields = tracing::field::debug(self.truncated_kvs(kvs));
        tracing::trace!(target: "sqlweave.sql", event = name, elapsed = ?elapsed, fields = fields);
    }

    fn span_start(&self, name: &str, sql: &str) {
        let sql = self.truncate_sql(sql);
        emit_at_level!(self.level, target: "sqlweave.sql", event = name, sql = %sql);
    }
}
