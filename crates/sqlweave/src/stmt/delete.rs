//! DELETE statement builder.

use super::{Statement, build_limit, build_returning, build_where, expand_star, to_strings};
use crate::buffer::Buffer;
use crate::builder::{Builder, Comments, Raw};
use crate::condition::{self, Condition};
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::row::Schema;
use crate::value::Value;

/// DELETE statement.
#[derive(Clone, Debug, Default)]
pub struct DeleteStmt {
    raw: Option<Raw>,
    comments: Comments,
    table: String,
    where_conds: Vec<Condition>,
    limit: Option<u64>,
    returning: Vec<String>,
}

/// `DELETE FROM table`
pub fn delete_from(table: impl Into<String>) -> DeleteStmt {
    DeleteStmt {
        table: table.into(),
        ..Default::default()
    }
}

/// DELETE from hand-written SQL; structured fields are ignored.
pub fn delete_by_sql<T: Into<Value>>(
    query: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> DeleteStmt {
    DeleteStmt {
        raw: Some(Raw::new(query, values)),
        ..Default::default()
    }
}

impl DeleteStmt {
    /// Add a WHERE condition. Repeated calls are AND-ed.
    pub fn where_(mut self, cond: Condition) -> Self {
        self.where_conds.push(cond);
        self
    }

    /// Add a raw WHERE fragment with `?` placeholders.
    pub fn where_expr<T: Into<Value>>(
        mut self,
        sql: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.where_conds.push(condition::expr(sql, values));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// RETURNING columns. A lone `*` is expanded against the load destination.
    pub fn returning<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.returning = to_strings(cols);
        self
    }

    /// Prepend a `/* comment */` line.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl Builder for DeleteStmt {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        if let Some(raw) = &self.raw {
            return raw.build(d, buf);
        }
        if self.table.is_empty() {
            return Err(SqlError::TableNotSpecified);
        }

        self.comments.build(d, buf)?;
        buf.write_str("DELETE FROM ");
        buf.write_str(&d.quote_ident(&self.table));
        build_where(d, buf, &self.where_conds)?;
        build_limit(buf, self.limit);
        build_returning(d, buf, &self.returning);
        Ok(())
    }
}

impl Statement for DeleteStmt {
    fn expand_returning(&self, schema: &Schema) -> Option<Self> {
        let returning = expand_star(&self.returning, schema)?;
        Some(Self {
            returning,
            ..self.clone()
        })
    }
}
