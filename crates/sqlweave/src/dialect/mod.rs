//! SQL dialects.
//!
//! A [`Dialect`] supplies the per-database conventions a builder needs: how identifiers are
//! quoted, how literals are spelled when inlined, and what a positional placeholder looks
//! like. Dialects are stateless; pick one of the statics below and pass it everywhere.
//!
//! ```ignore
//! use sqlweave::{dialect, delete_from, eq, Buffer, Builder};
//!
//! let mut buf = Buffer::new();
//! delete_from("t").where_(eq("a", 1)).build(dialect::MYSQL, &mut buf)?;
//! assert_eq!(buf.as_str(), "DELETE FROM `t` WHERE (`a` = ?)");
//! ```

mod mssql;
mod mysql;
mod postgres;
mod sqlite;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};

pub use mssql::MsSql;
pub use mysql::MySql;
pub use postgres::PostgreSql;
pub use sqlite::Sqlite3;

/// MySQL: backtick identifiers, `?` placeholders.
pub static MYSQL: &dyn Dialect = &MySql;
/// PostgreSQL: double-quoted identifiers, `$1, $2, ...` placeholders.
pub static POSTGRES: &dyn Dialect = &PostgreSql;
/// SQLite3: double-quoted identifiers, `?` placeholders.
pub static SQLITE3: &dyn Dialect = &Sqlite3;
/// SQL Server: bracketed identifiers, `@p1, @p2, ...` placeholders.
pub static MSSQL: &dyn Dialect = &MsSql;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Per-database quoting, literal encoding and placeholder conventions.
pub trait Dialect: Send + Sync {
    /// Registry name of this dialect.
    fn name(&self) -> &'static str;

    /// Quote a possibly dotted identifier (`table.column`).
    fn quote_ident(&self, id: &str) -> String;

    /// Encode a string literal.
    fn encode_string(&self, s: &str) -> String;

    /// Encode a boolean literal.
    fn encode_bool(&self, b: bool) -> String;

    /// Encode a timestamp literal (UTC).
    fn encode_time(&self, t: &DateTime<Utc>) -> String;

    /// Encode a binary literal.
    fn encode_bytes(&self, b: &[u8]) -> String;

    /// Placeholder for the value at 0-based position `n` of the bound-value list.
    fn placeholder(&self, n: usize) -> String;
}

impl std::fmt::Debug for dyn Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dialect").field(&self.name()).finish()
    }
}

/// Resolve a dialect by name.
///
/// Accepts `mysql`, `postgres`/`postgresql`, `sqlite`/`sqlite3` and `mssql`/`sqlserver`,
/// case-insensitively.
pub fn from_name(name: &str) -> Option<&'static dyn Dialect> {
    match name.trim().to_ascii_lowercase().as_str() {
        "mysql" => Some(MYSQL),
        "postgres" | "postgresql" => Some(POSTGRES),
        "sqlite" | "sqlite3" => Some(SQLITE3),
        "mssql" | "sqlserver" => Some(MSSQL),
        _ => None,
    }
}

/// Quote each dotted part between `open` and `close`, doubling `close` inside a part.
///
/// A `*` part is left bare so `t.*` stays a valid column list.
pub(crate) fn quote_ident_parts(id: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(id.len() + 2);
    for (i, part) in id.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if part == "*" {
            out.push('*');
            continue;
        }
        out.push(open);
        for c in part.chars() {
            if c == close {
                out.push(close);
            }
            out.push(c);
        }
        out.push(close);
    }
    out
}

/// Standard SQL string literal: single quotes, `'` doubled.
pub(crate) fn quote_string_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

pub(crate) fn format_time(t: &DateTime<Utc>) -> String {
    format!("'{}'", t.format(TIME_FORMAT))
}

pub(crate) fn hex(b: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(b.len() * 2);
    for byte in b {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
