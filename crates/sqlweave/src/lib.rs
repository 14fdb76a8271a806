//! # sqlweave
//!
//! A composable SQL statement builder with pluggable dialects.
//!
//! ## Features
//!
//! - **Builders all the way down**: statements, conditions and raw fragments share one
//!   [`Builder`] contract and nest freely (subqueries in IN, FROM and SET)
//! - **Dialects**: MySQL, PostgreSQL, SQLite3 and SQL Server quoting, literals and placeholders
//! - **Explicit placeholders**: builders write `?`; the session numbers them per dialect
//!   (`$1`, `@p1`, `?`) or inlines literals when interpolation is on
//! - **Loading**: rows decode through [`FromRow`] into `Vec<T>` or `Option<T>`;
//!   `RETURNING *` expands to the destination's columns
//! - **Observability**: [`event::EventReceiver`] spans, timings and error events, with a
//!   `tracing` receiver behind the default `tracing` feature
//! - **Deadlines**: [`Context`] timeouts and cancellation with best-effort server-side cancel
//!
//! ## Example
//!
//! ```ignore
//! use sqlweave::{Session, Statement, delete_from, dialect, eq, insert_into, select, update};
//!
//! let session = Session::new(client, dialect::POSTGRES);
//!
//! insert_into("users")
//!     .columns(["name", "email"])
//!     .values(["alice", "alice@example.com"])
//!     .exec(&session)
//!     .await?;
//!
//! let users: Vec<User> = session
//!     .fetch_all(&select(["*"]).from("users").where_(eq("status", "active")).limit(10))
//!     .await?;
//!
//! update("users")
//!     .set("status", "inactive")
//!     .where_(eq("id", 7))
//!     .exec(&session)
//!     .await?;
//!
//! let mut removed: Vec<User> = Vec::new();
//! delete_from("users")
//!     .where_(eq("id", 7))
//!     .returning(["*"])
//!     .load(&session, &mut removed)
//!     .await?;
//! ```

pub mod buffer;
pub mod builder;
pub mod client;
pub mod condition;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod event;
pub mod interpolate;
pub mod row;
pub mod session;
pub mod stmt;
pub mod transaction;
pub mod value;

pub use buffer::Buffer;
pub use builder::{Arg, Builder, Comments, Raw, SubQuery};
pub use client::{ExecResult, Runner};
pub use condition::{
    Condition, Operand, and, between, eq, expr, expr_args, gt, gte, in_list, in_subquery,
    is_not_null, is_null, like, lt, lte, neq, not, not_between, not_in, not_in_subquery,
    not_like, or,
};
pub use config::SessionConfig;
pub use context::{CancelHandle, Context};
pub use dialect::Dialect;
pub use error::{SqlError, SqlResult};
pub use interpolate::{Compiled, compile, interpolate_for_dialect};
pub use row::{Field, FromRow, Load, Row, Schema};
pub use session::Session;
pub use stmt::{
    DeleteStmt, InsertStmt, JoinKind, JoinOn, SelectStmt, Statement, UpdateStmt, delete_by_sql,
    delete_from, insert_by_sql, insert_into, select, select_by_sql, update, update_by_sql,
};
pub use value::{FromValue, Value};

#[cfg(feature = "derive")]
pub use sqlweave_derive::FromRow;
