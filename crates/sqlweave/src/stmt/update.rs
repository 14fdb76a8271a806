//! UPDATE statement builder.

use super::{Statement, build_limit, build_returning, build_where, expand_star, to_strings};
use crate::buffer::Buffer;
use crate::builder::{Builder, Comments, Raw, SubQuery};
use crate::condition::{self, Condition};
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::row::Schema;
use crate::value::Value;

#[derive(Clone, Debug)]
enum Assignment {
    Value(Value),
    Expr(Raw),
    Sub(SubQuery),
}

/// UPDATE statement.
#[derive(Clone, Debug, Default)]
pub struct UpdateStmt {
    raw: Option<Raw>,
    comments: Comments,
    table: String,
    sets: Vec<(String, Assignment)>,
    map_sets: Vec<(String, Assignment)>,
    where_conds: Vec<Condition>,
    limit: Option<u64>,
    returning: Vec<String>,
}

/// `UPDATE table`
pub fn update(table: impl Into<String>) -> UpdateStmt {
    UpdateStmt {
        table: table.into(),
        ..Default::default()
    }
}

/// UPDATE from hand-written SQL; structured fields are ignored.
pub fn update_by_sql<T: Into<Value>>(
    query: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> UpdateStmt {
    UpdateStmt {
        raw: Some(Raw::new(query, values)),
        ..Default::default()
    }
}

impl UpdateStmt {
    // ==================== SET ====================

    /// `column = ?`
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sets.push((column.into(), Assignment::Value(value.into())));
        self
    }

    /// `column = <sql>`, where `sql` may carry its own `?` placeholders.
    ///
    /// ```ignore
    /// update("counters").set_expr("hits", "hits + ?", [1]);
    /// ```
    pub fn set_expr<T: Into<Value>>(
        mut self,
        column: impl Into<String>,
        sql: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.sets
            .push((column.into(), Assignment::Expr(Raw::new(sql, values))));
        self
    }

    /// `column = (<subquery>)`
    pub fn set_subquery<B: Builder + 'static>(
        mut self,
        column: impl Into<String>,
        query: B,
    ) -> Self {
        self.sets
            .push((column.into(), Assignment::Sub(SubQuery::new(query))));
        self
    }

    /// Add assignments from a map. They follow the explicit `set` calls, in the map's own
    /// iteration order (pass a `BTreeMap` for stable text).
    pub fn set_map<K, V>(mut self, map: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.map_sets.extend(
            map.into_iter()
                .map(|(k, v)| (k.into(), Assignment::Value(v.into()))),
        );
        self
    }

    // ==================== WHERE / tail ====================

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

impl Builder for UpdateStmt {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        if let Some(raw) = &self.raw {
            return raw.build(d, buf);
        }
        if self.table.is_empty() {
            return Err(SqlError::TableNotSpecified);
        }
        if self.sets.is_empty() && self.map_sets.is_empty() {
            return Err(SqlError::ColumnNotSpecified);
        }

        self.comments.build(d, buf)?;
        buf.write_str("UPDATE ");
        buf.write_str(&d.quote_ident(&self.table));
        buf.write_str(" SET ");
        for (i, (column, assignment)) in self.sets.iter().chain(&self.map_sets).enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            buf.write_str(&d.quote_ident(column));
            buf.write_str(" = ");
            match assignment {
                Assignment::Value(v) => buf.push_bind(v.clone()),
                Assignment::Expr(raw) => raw.build(d, buf)?,
                Assignment::Sub(sub) => sub.build_parenthesized(d, buf)?,
            }
        }
        build_where(d, buf, &self.where_conds)?;
        build_limit(buf, self.limit);
        build_returning(d, buf, &self.returning);
        Ok(())
    }
}

impl Statement for UpdateStmt {
    fn expand_returning(&self, schema: &Schema) -> Option<Self> {
        let returning = expand_star(&self.returning, schema)?;
        Some(Self {
            returning,
            ..self.clone()
        })
    }
}
