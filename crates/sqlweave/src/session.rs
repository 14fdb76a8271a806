//! Execution façade: build, rewrite placeholders, run, load.

use crate::builder::Builder;
use crate::client::{ExecResult, Runner};
use crate::config::SessionConfig;
use crate::context::Context;
use crate::dialect::{self, Dialect};
use crate::error::{SqlError, SqlResult};
use crate::event::{self, EventReceiver, Kvs, NullReceiver};
use crate::interpolate::{Compiled, compile};
use crate::row::{FromRow, Load, Row, Schema};
use crate::stmt::Statement;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A runner bound to a dialect, an event receiver and a configuration.
///
/// ```ignore
/// let session = Session::new(client, sqlweave::dialect::POSTGRES)
///     .with_receiver(TracingReceiver::new());
///
/// let users: Vec<User> = session
///     .fetch_all(&select(["*"]).from("users").where_(eq("active", true)))
///     .await?;
/// ```
pub struct Session<R> {
    runner: R,
    dialect: &'static dyn Dialect,
    receiver: Arc<dyn EventReceiver>,
    config: SessionConfig,
}

impl<R: Runner> Session<R> {
    /// Create a session with default configuration and no event receiver.
    pub fn new(runner: R, dialect: &'static dyn Dialect) -> Self {
        Self {
            runner,
            dialect,
            receiver: Arc::new(NullReceiver),
            config: SessionConfig::new().dialect(dialect.name()),
        }
    }

    /// Create a session from configuration, resolving the dialect by name.
    pub fn from_config(runner: R, config: SessionConfig) -> SqlResult<Self> {
        let dialect = dialect::from_name(&config.dialect)
            .ok_or_else(|| SqlError::UnknownDialect(config.dialect.clone()))?;
        Ok(Self {
            runner,
            dialect,
            receiver: Arc::new(NullReceiver),
            config,
        })
    }

    /// Set the event receiver.
    pub fn with_receiver<E: EventReceiver + 'static>(mut self, receiver: E) -> Self {
        self.receiver = Arc::new(receiver);
        self
    }

    /// Set the event receiver from an Arc.
    pub fn with_receiver_arc(mut self, receiver: Arc<dyn EventReceiver>) -> Self {
        self.receiver = receiver;
        self
    }

    /// Set the query timeout.
    ///
    /// Runs exceeding this duration are cancelled and return a timeout error.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = Some(timeout);
        self
    }

    /// Set the slow query threshold.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.config.slow_query_threshold = Some(threshold);
        self
    }

    /// Inline values as literals instead of binding them.
    pub fn interpolate(mut self, on: bool) -> Self {
        self.config.interpolate = on;
        self
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get a reference to the inner runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Get the inner runner, consuming the session.
    pub fn into_inner(self) -> R {
        self.runner
    }

    // ==================== Exec ====================

    /// Run a statement that returns no rows.
    pub async fn exec<S: Builder + ?Sized>(&self, stmt: &S) -> SqlResult<ExecResult> {
        self.exec_context(&Context::background(), stmt).await
    }

    /// [`Session::exec`] bounded by `ctx`.
    pub async fn exec_context<S: Builder + ?Sized>(
        &self,
        ctx: &Context,
        stmt: &S,
    ) -> SqlResult<ExecResult> {
        let compiled = compile(stmt, self.dialect, self.config.interpolate)
            .inspect_err(|e| self.receiver.event_err(event::EXEC_INTERPOLATE, e))?;
        let kvs = self.kvs(&compiled);

        self.receiver.span_start(event::EXEC, &compiled.sql);
        let start = Instant::now();
        let result = self
            .run(ctx, self.runner.execute(&compiled.sql, &compiled.values))
            .await;
        self.finish(event::EXEC, start.elapsed(), &kvs);

        result.inspect_err(|e| self.receiver.event_err_kv(event::EXEC_EXEC, e, &kvs))
    }

    // ==================== Load ====================

    /// Run a query and load every row into `dest`. Returns the number of rows loaded.
    ///
    /// `RETURNING *` is expanded to the destination's schema first.
    pub async fn load<S: Statement, D: Load>(&self, stmt: &S, dest: &mut D) -> SqlResult<usize> {
        self.load_context(&Context::background(), stmt, dest).await
    }

    /// [`Session::load`] bounded by `ctx`.
    pub async fn load_context<S: Statement, D: Load>(
        &self,
        ctx: &Context,
        stmt: &S,
        dest: &mut D,
    ) -> SqlResult<usize> {
        let rows = self.query_rows(ctx, stmt, &dest.schema()).await?;
        self.scan(rows, dest)
    }

    /// Run a query and load its first row into `dest`.
    ///
    /// Semantics:
    /// - 0 rows: returns [`SqlError::NotFound`]
    /// - 1 row: loads that row
    /// - multiple rows: loads the first row (does **not** error)
    pub async fn load_one<S: Statement, D: Load>(&self, stmt: &S, dest: &mut D) -> SqlResult<()> {
        self.load_one_context(&Context::background(), stmt, dest).await
    }

    /// [`Session::load_one`] bounded by `ctx`.
    pub async fn load_one_context<S: Statement, D: Load>(
        &self,
        ctx: &Context,
        stmt: &S,
        dest: &mut D,
    ) -> SqlResult<()> {
        let mut rows = self.query_rows(ctx, stmt, &dest.schema()).await?;
        if rows.is_empty() {
            return Err(SqlError::not_found("Expected one row, got none"));
        }
        rows.truncate(1);
        self.scan(rows, dest)?;
        Ok(())
    }

    /// Run a query and decode every row as `T`.
    pub async fn fetch_all<T, S>(&self, stmt: &S) -> SqlResult<Vec<T>>
    where
        T: FromRow + Send,
        S: Statement,
    {
        let mut out = Vec::new();
        self.load(stmt, &mut out).await?;
        Ok(out)
    }

    /// Run a query and decode the first row as `T`; [`SqlError::NotFound`] when empty.
    pub async fn fetch_one<T, S>(&self, stmt: &S) -> SqlResult<T>
    where
        T: FromRow + Send,
        S: Statement,
    {
        let mut out: Option<T> = None;
        self.load_one(stmt, &mut out).await?;
        out.ok_or_else(|| SqlError::not_found("Expected one row, got none"))
    }

    // ==================== Internals ====================

    async fn query_rows<S: Statement>(
        &self,
        ctx: &Context,
        stmt: &S,
        schema: &Schema,
    ) -> SqlResult<Vec<Row>> {
        let expanded = stmt.expand_returning(schema);
        let target = expanded.as_ref().unwrap_or(stmt);

        let compiled = compile(target, self.dialect, self.config.interpolate)
            .inspect_err(|e| self.receiver.event_err(event::SELECT_INTERPOLATE, e))?;
        let kvs = self.kvs(&compiled);

        self.receiver.span_start(event::SELECT, &compiled.sql);
        let start = Instant::now();
        let result = self
            .run(ctx, self.runner.query(&compiled.sql, &compiled.values))
            .await;
        self.finish(event::SELECT, start.elapsed(), &kvs);

        result.inspect_err(|e| self.receiver.event_err_kv(event::SELECT_LOAD_QUERY, e, &kvs))
    }

    fn scan<D: Load>(&self, rows: Vec<Row>, dest: &mut D) -> SqlResult<usize> {
        dest.load(rows)
            .inspect_err(|e| self.receiver.event_err(event::SELECT_LOAD_SCAN, e))
    }

    /// Race the runner future against the context and the session timeout.
    async fn run<T, F>(&self, ctx: &Context, future: F) -> SqlResult<T>
    where
        F: std::future::Future<Output = SqlResult<T>> + Send,
    {
        let start = tokio::time::Instant::now();
        let ctx = match self.config.query_timeout {
            Some(timeout) => ctx.clone().timeout(timeout),
            None => ctx.clone(),
        };
        let deadline = ctx.deadline();

        tokio::pin!(future);
        let interrupted = tokio::select! {
            biased;
            _ = ctx.cancelled() => SqlError::Cancelled,
            _ = sleep_until(deadline) => SqlError::Timeout(
                deadline.map(|d| d.saturating_duration_since(start)).unwrap_or_default(),
            ),
            result = &mut future => return result,
        };

        if let Some(cancel_token) = self.runner.cancel_token() {
            tokio::spawn(async move {
                let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
            });
        }
        Err(interrupted)
    }

    fn finish(&self, name: &str, elapsed: Duration, kvs: &Kvs) {
        self.receiver.span_finish(name);
        self.receiver.timing_kv(name, elapsed, kvs);

        if let Some(threshold) = self.config.slow_query_threshold
            && elapsed > threshold
        {
            let mut kvs = kvs.clone();
            kvs.insert("elapsed_ms".to_string(), elapsed.as_millis().to_string());
            self.receiver.event_kv(event::SLOW_QUERY, &kvs);
        }
    }

    fn kvs(&self, compiled: &Compiled) -> Kvs {
        let mut kvs = Kvs::new();
        kvs.insert("sql".to_string(), compiled.sql.clone());
        kvs.insert("dialect".to_string(), self.dialect.name().to_string());
        if self.config.log_args {
            let args = serde_json::to_string(&compiled.values).unwrap_or_default();
            kvs.insert("args".to_string(), args);
        }
        kvs
    }
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl<R> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("dialect", &self.dialect.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
