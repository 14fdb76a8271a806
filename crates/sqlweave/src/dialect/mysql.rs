use super::{Dialect, format_time, hex, quote_ident_parts};
use chrono::{DateTime, Utc};

/// MySQL dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_ident(&self, id: &str) -> String {
        quote_ident_parts(id, '`', '`')
    }

    // MySQL treats backslash as an escape inside string literals by default.
    fn encode_string(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        for c in s.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
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

    fn placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }
}
