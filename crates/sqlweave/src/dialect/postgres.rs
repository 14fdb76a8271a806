use super::{Dialect, format_time, hex, quote_ident_parts, quote_string_ansi};
use chrono::{DateTime, Utc};

/// PostgreSQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgreSql;

impl Dialect for PostgreSql {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_ident(&self, id: &str) -> String {
        quote_ident_parts(id, '"', '"')
    }

    fn encode_string(&self, s: &str) -> String {
        quote_string_ansi(s)
    }

    fn encode_bool(&self, b: bool) -> String {
        if b { "TRUE" } else { "FALSE" }.to_string()
    }

    fn encode_time(&self, t: &DateTime<Utc>) -> String {
        format_time(t)
    }

    fn encode_bytes(&self, b: &[u8]) -> String {
        format!("E'\\\\x{}'", hex(b))
    }

    fn placeholder(&self, n: usize) -> String {
        format!("${}", n + 1)
    }
}
