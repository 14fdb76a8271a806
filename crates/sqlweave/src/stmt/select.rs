//! SELECT statement builder.

use super::{Statement, build_limit, build_where, to_strings};
use crate::buffer::Buffer;
use crate::builder::{Builder, Comments, Raw, SubQuery};
use crate::condition::{self, Condition, build_and};
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;

#[derive(Clone, Debug)]
enum Column {
    Name(String),
    Expr(Raw),
}

#[derive(Clone, Debug)]
enum Source {
    Table(String),
    Expr(Raw),
    Sub { query: SubQuery, alias: String },
}

#[derive(Clone, Debug)]
enum Ordering {
    Clause(String),
    Column { name: String, desc: bool },
}

/// JOIN flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => " JOIN ",
            JoinKind::Left => " LEFT JOIN ",
            JoinKind::Right => " RIGHT JOIN ",
            JoinKind::Full => " FULL JOIN ",
        }
    }
}

/// JOIN predicate: hand-written text or a condition tree.
///
/// Hand-written text binds nothing; a `?` in it is sent as a literal `?`. Use a
/// [`Condition`] (for instance [`crate::expr`]) to bind values.
#[derive(Clone, Debug)]
pub enum JoinOn {
    Raw(String),
    Cond(Condition),
}

impl From<&str> for JoinOn {
    fn from(s: &str) -> Self {
        JoinOn::Raw(s.to_string())
    }
}

impl From<String> for JoinOn {
    fn from(s: String) -> Self {
        JoinOn::Raw(s)
    }
}

impl From<Condition> for JoinOn {
    fn from(c: Condition) -> Self {
        JoinOn::Cond(c)
    }
}

#[derive(Clone, Debug)]
struct Join {
    kind: JoinKind,
    table: String,
    on: JoinOn,
}

/// SELECT statement.
#[derive(Clone, Debug, Default)]
pub struct SelectStmt {
    raw: Option<Raw>,
    comments: Comments,
    distinct: bool,
    columns: Vec<Column>,
    source: Option<Source>,
    joins: Vec<Join>,
    where_conds: Vec<Condition>,
    group_by: Vec<String>,
    having: Vec<Condition>,
    order_by: Vec<Ordering>,
    limit: Option<u64>,
    offset: Option<u64>,
    for_update: bool,
    suffixes: Vec<Raw>,
}

/// `SELECT cols`. An empty list selects `*`.
pub fn select<S: Into<String>>(cols: impl IntoIterator<Item = S>) -> SelectStmt {
    SelectStmt {
        columns: to_strings(cols).into_iter().map(Column::Name).collect(),
        ..Default::default()
    }
}

/// SELECT from hand-written SQL; structured fields are ignored.
pub fn select_by_sql<T: Into<Value>>(
    query: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> SelectStmt {
    SelectStmt {
        raw: Some(Raw::new(query, values)),
        ..Default::default()
    }
}

impl SelectStmt {
    // ==================== Columns & source ====================

    /// Add one quoted column.
    pub fn column(mut self, col: impl Into<String>) -> Self {
        self.columns.push(Column::Name(col.into()));
        self
    }

    /// Add a raw column expression, written unquoted (`COUNT(*) AS n`).
    pub fn column_expr<T: Into<Value>>(
        mut self,
        sql: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.columns.push(Column::Expr(Raw::new(sql, values)));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// `FROM "table"`
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.source = Some(Source::Table(table.into()));
        self
    }

    /// `FROM <sql>`, written verbatim (`users AS u`, table functions).
    pub fn from_expr<T: Into<Value>>(
        mut self,
        sql: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.source = Some(Source::Expr(Raw::new(sql, values)));
        self
    }

    /// `FROM (<subquery>) AS "alias"`
    pub fn from_subquery<B: Builder + 'static>(
        mut self,
        query: B,
        alias: impl Into<String>,
    ) -> Self {
        self.source = Some(Source::Sub {
            query: SubQuery::new(query),
            alias: alias.into(),
        });
        self
    }

    // ==================== Joins ====================

    pub fn join(self, table: impl Into<String>, on: impl Into<JoinOn>) -> Self {
        self.add_join(JoinKind::Inner, table.into(), on.into())
    }

    pub fn left_join(self, table: impl Into<String>, on: impl Into<JoinOn>) -> Self {
        self.add_join(JoinKind::Left, table.into(), on.into())
    }

    pub fn right_join(self, table: impl Into<String>, on: impl Into<JoinOn>) -> Self {
        self.add_join(JoinKind::Right, table.into(), on.into())
    }

    pub fn full_join(self, table: impl Into<String>, on: impl Into<JoinOn>) -> Self {
        self.add_join(JoinKind::Full, table.into(), on.into())
    }

    fn add_join(mut self, kind: JoinKind, table: String, on: JoinOn) -> Self {
        self.joins.push(Join { kind, table, on });
        self
    }

    // ==================== WHERE ====================

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

    // ==================== Ordering & Grouping ====================

    /// Add a GROUP BY clause, written verbatim. A `?` in it is a literal, not a placeholder.
    pub fn group_by(mut self, clause: impl Into<String>) -> Self {
        self.group_by.push(clause.into());
        self
    }

    /// Add a HAVING condition. Repeated calls are AND-ed.
    pub fn having(mut self, cond: Condition) -> Self {
        self.having.push(cond);
        self
    }

    /// Add an ORDER BY clause, written verbatim. A `?` in it is a literal, not a placeholder.
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by.push(Ordering::Clause(clause.into()));
        self
    }

    /// Add ORDER BY column ASC.
    pub fn order_by_asc(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(Ordering::Column {
            name: column.into(),
            desc: false,
        });
        self
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(Ordering::Column {
            name: column.into(),
            desc: true,
        });
        self
    }

    // ==================== Pagination ====================

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: u64, per_page: u64) -> Self {
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((page.max(1) - 1).saturating_mul(size));
        self
    }

    // ==================== Tail ====================

    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    /// Append raw SQL after everything else (`LOCK IN SHARE MODE`, `NOWAIT`).
    pub fn suffix<T: Into<Value>>(
        mut self,
        sql: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        self.suffixes.push(Raw::new(sql, values));
        self
    }

    /// Prepend a `/* comment */` line.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text);
        self
    }

    // ==================== Build helpers ====================

    fn build_columns(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        if self.columns.is_empty() {
            buf.write_str("*");
            return Ok(());
        }
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            match col {
                Column::Name(name) => buf.write_str(&d.quote_ident(name)),
                Column::Expr(raw) => raw.build(d, buf)?,
            }
        }
        Ok(())
    }

    fn build_source(source: &Source, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        match source {
            Source::Table(table) => buf.write_str(&d.quote_ident(table)),
            Source::Expr(raw) => raw.build(d, buf)?,
            Source::Sub { query, alias } => {
                query.build_parenthesized(d, buf)?;
                buf.write_str(" AS ");
                buf.write_str(&d.quote_ident(alias));
            }
        }
        Ok(())
    }

    fn build_joins(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        for join in &self.joins {
            buf.write_str(join.kind.keyword());
            buf.write_str(&d.quote_ident(&join.table));
            buf.write_str(" ON ");
            match &join.on {
                JoinOn::Raw(text) => buf.write_verbatim(text),
                JoinOn::Cond(cond) => cond.build(d, buf)?,
            }
        }
        Ok(())
    }

    fn build_order(&self, d: &dyn Dialect, buf: &mut Buffer) {
        if self.order_by.is_empty() {
            return;
        }
        buf.write_str(" ORDER BY ");
        for (i, order) in self.order_by.iter().enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            match order {
                Ordering::Clause(clause) => buf.write_verbatim(clause),
                Ordering::Column { name, desc } => {
                    buf.write_str(&d.quote_ident(name));
                    buf.write_str(if *desc { " DESC" } else { " ASC" });
                }
            }
        }
    }
}

impl Builder for SelectStmt {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        if let Some(raw) = &self.raw {
            return raw.build(d, buf);
        }
        let source = match &self.source {
            Some(Source::Table(t)) if t.is_empty() => return Err(SqlError::TableNotSpecified),
            Some(source) => source,
            None => return Err(SqlError::TableNotSpecified),
        };

        self.comments.build(d, buf)?;
        buf.write_str("SELECT ");
        if self.distinct {
            buf.write_str("DISTINCT ");
        }
        self.build_columns(d, buf)?;
        buf.write_str(" FROM ");
        Self::build_source(source, d, buf)?;
        self.build_joins(d, buf)?;
        build_where(d, buf, &self.where_conds)?;

        if !self.group_by.is_empty() {
            buf.write_str(" GROUP BY ");
            buf.write_verbatim(&self.group_by.join(", "));
        }
        if !self.having.is_empty() {
            buf.write_str(" HAVING ");
            build_and(d, buf, &self.having)?;
        }

        self.build_order(d, buf);
        build_limit(buf, self.limit);
        if let Some(n) = self.offset {
            buf.write_str(" OFFSET ");
            buf.write_str(&n.to_string());
        }
        if self.for_update {
            buf.write_str(" FOR UPDATE");
        }
        for suffix in &self.suffixes {
            buf.write_str(" ");
            suffix.build(d, buf)?;
        }
        Ok(())
    }
}

impl Statement for SelectStmt {}
