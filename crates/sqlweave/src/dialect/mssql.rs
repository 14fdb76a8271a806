use super::{Dialect, format_time, hex, quote_ident_parts, quote_string_ansi};
use chrono::{DateTime, Utc};

/// Microsoft SQL Server dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsSql;

impl Dialect for MsSql {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote_ident(&self, id: &str) -> String {
        quote_ident_parts(id, '[', ']')
    }

    // N prefix keeps non-ASCII text intact in NVARCHAR columns.
    fn encode_string(&self, s: &str) -> String {
        format!("N{}", quote_string_ansi(s))
    }

    fn encode_bool(&self, b: bool) -> String {
        if b { "1" } else { "0" }.to_string()
    }

    fn encode_time(&self, t: &DateTime<Utc>) -> String {
        format_time(t)
    }

    fn encode_bytes(&self, b: &[u8]) -> String {
        format!("0x{}", hex(b))
    }

    fn placeholder(&self, n: usize) -> String {
        format!("@p{}", n + 1)
    }
}
