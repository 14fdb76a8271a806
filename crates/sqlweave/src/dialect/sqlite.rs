use super::{Dialect, format_time, hex, quote_ident_parts, quote_string_ansi};
use chrono::{DateTime, Utc};

/// SQLite3 dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite3;

impl Dialect for Sqlite3 {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn quote_ident(&self, id: &str) -> String {
        quote_ident_parts(id, '"', '"')
    }

    fn encode_string(&self, s: &str) -> String {
        quote_string_ansi(s)
    }

    fn encode_bool(&self, b: bool) -> String {
        if b { "1" } else { "0" }.to_string()
    }

    fn encode_time(&self, t: &DateTime<Utc>) -> String {
        format_time(t)
    }

    fn encode_bytes(&self, b: &[u8]) -> String {
        format!("X'{}'", hex(b))
    }

    fn placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }
}
