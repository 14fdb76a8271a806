//! SELECT/INSERT/UPDATE/DELETE statement builders.
//!
//! Every statement is a plain value built with by-value fluent calls and serialized through
//! [`Builder::build`]. Building writes neutral `?` markers; the session turns them into the
//! dialect's placeholders right before execution.
//!
//! # Usage
//!
//! ```ignore
//! use sqlweave::{delete_from, eq, insert_into, select, update};
//!
//! let q = select(["id", "name"]).from("users").where_(eq("status", "active")).limit(20);
//!
//! let q = insert_into("users").columns(["name", "email"]).values(["alice", "a@x.io"]);
//!
//! let q = update("users").set("status", "inactive").where_(eq("id", 7));
//!
//! let q = delete_from("users").where_(eq("id", 7)).returning(["id"]);
//! ```

mod delete;
mod insert;
mod select;
mod update;


pub use delete::{DeleteStmt, delete_by_sql, delete_from};
pub use insert::{InsertStmt, insert_by_sql, insert_into};
pub use select::{JoinKind, JoinOn, SelectStmt, select, select_by_sql};
pub use update::{UpdateStmt, update, update_by_sql};

use crate::buffer::Buffer;
use crate::builder::Builder;
use crate::client::{ExecResult, Runner};
use crate::condition::{Condition, build_and};
use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::row::{Load, Schema};
use crate::session::Session;

/// A complete statement that a [`Session`] can run.
pub trait Statement: Builder + Sized {
    /// Copy of this statement with `RETURNING *` replaced by the schema's columns.
    ///
    /// `None` when there is nothing to expand (no `RETURNING *`, or an empty schema).
    fn expand_returning(&self, schema: &Schema) -> Option<Self> {
        let _ = schema;
        None
    }

    /// Execute through `session` and report affected rows.
    fn exec<R: Runner>(
        &self,
        session: &Session<R>,
    ) -> impl std::future::Future<Output = SqlResult<ExecResult>> + Send {
        session.exec(self)
    }

    /// Run through `session` and load every returned row into `dest`.
    fn load<R: Runner, D: Load>(
        &self,
        session: &Session<R>,
        dest: &mut D,
    ) -> impl std::future::Future<Output = SqlResult<usize>> + Send {
        session.load(self, dest)
    }

    /// Run through `session` and load the first returned row into `dest`.
    ///
    /// Returns [`crate::SqlError::NotFound`] when no row comes back.
    fn load_one<R: Runner, D: Load>(
        &self,
        session: &Session<R>,
        dest: &mut D,
    ) -> impl std::future::Future<Output = SqlResult<()>> + Send {
        session.load_one(self, dest)
    }
}

pub(crate) fn build_where(d: &dyn Dialect, buf: &mut Buffer, conds: &[Condition]) -> SqlResult<()> {
    if conds.is_empty() {
        return Ok(());
    }
    buf.write_str(" WHERE ");
    build_and(d, buf, conds)
}

pub(crate) fn build_limit(buf: &mut Buffer, limit: Option<u64>) {
    if let Some(n) = limit {
        buf.write_str(" LIMIT ");
        buf.write_str(&n.to_string());
    }
}

pub(crate) fn build_returning(d: &dyn Dialect, buf: &mut Buffer, cols: &[String]) {
    if cols.is_empty() {
        return;
    }
    buf.write_str(" RETURNING ");
    write_ident_list(d, buf, cols, ",");
}

pub(crate) fn write_ident_list(d: &dyn Dialect, buf: &mut Buffer, cols: &[String], sep: &str) {
    for (i, col) in cols.iter().enumerate() {
        if i > 0 {
            buf.write_str(sep);
        }
        buf.write_str(&d.quote_ident(col));
    }
}

/// Replacement RETURNING list for a bare `*`, taken from the destination schema.
pub(crate) fn expand_star(cols: &[String], schema: &Schema) -> Option<Vec<String>> {
    match cols {
        [only] if only == "*" && !schema.is_empty() => Some(schema.columns()),
        _ => None,
    }
}

pub(crate) fn to_strings<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Vec<String> {
    items.into_iter().map(Into::into).collect()
}
