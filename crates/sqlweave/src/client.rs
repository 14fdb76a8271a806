//! The runner trait: the driver seam every session executes through.

use crate::error::{SqlError, SqlResult};
use crate::row::{Row, rows_from_pg};
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Outcome of a non-query statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Driver-reported generated id, when the driver has one (MySQL-style drivers).
    pub last_insert_id: Option<i64>,
}

/// A trait that unifies database clients and transactions.
///
/// `sql` arrives with placeholders already in the session dialect's form and `values` bound
/// in placeholder order. Implement it for any driver; the PostgreSQL client and transaction
/// types are covered here.
pub trait Runner: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<Vec<Row>>> + Send;

    /// Execute a statement and report affected rows.
    fn execute(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<ExecResult>> + Send;

    /// Best-effort server-side cancel handle, used when a deadline fires.
    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        None
    }
}

fn as_params(values: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl Runner for tokio_postgres::Client {
    async fn query(&self, sql: &str, values: &[Value]) -> SqlResult<Vec<Row>> {
        let rows = tokio_postgres::Client::query(self, sql, &as_params(values))
            .await
            .map_err(SqlError::from_db_error)?;
        rows_from_pg(rows)
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> SqlResult<ExecResult> {
        let rows_affected = tokio_postgres::Client::execute(self, sql, &as_params(values))
            .await
            .map_err(SqlError::from_db_error)?;
        Ok(ExecResult {
            rows_affected,
            last_insert_id: None,
        })
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Client::cancel_token(self))
    }
}

impl Runner for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, values: &[Value]) -> SqlResult<Vec<Row>> {
        let rows = tokio_postgres::Transaction::query(self, sql, &as_params(values))
            .await
            .map_err(SqlError::from_db_error)?;
        rows_from_pg(rows)
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> SqlResult<ExecResult> {
        let rows_affected = tokio_postgres::Transaction::execute(self, sql, &as_params(values))
            .await
            .map_err(SqlError::from_db_error)?;
        Ok(ExecResult {
            rows_affected,
            last_insert_id: None,
        })
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Transaction::cancel_token(self))
    }
}

impl<R: Runner> Runner for &R {
    fn query(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<Vec<Row>>> + Send {
        (**self).query(sql, values)
    }

    fn execute(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl std::future::Future<Output = SqlResult<ExecResult>> + Send {
        (**self).execute(sql, values)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        (**self).cancel_token()
    }
}
