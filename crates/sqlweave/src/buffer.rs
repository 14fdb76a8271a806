//! Output sink shared by every builder during one build.

use crate::value::Value;

/// Neutral placeholder marker written by builders.
///
/// Markers are rewritten into dialect placeholders (or inlined literals) by the
/// placeholder pass in [`crate::interpolate`]. `??` is an escaped literal `?`.
pub const PLACEHOLDER: &str = "?";

/// Escaped form of [`PLACEHOLDER`].
pub const ESCAPED_PLACEHOLDER: &str = "??";

/// Accumulated SQL text plus the values bound to its placeholders, in order.
///
/// The buffer performs no escaping; builders quote through the dialect.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    sql: String,
    values: Vec<Value>,
}

impl Buffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text verbatim.
    pub fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Append hand-written text that carries no placeholders. Every `?` is escaped, so it
    /// reaches the database as a literal `?` (PostgreSQL's jsonb `?` operator, for one).
    pub fn write_verbatim(&mut self, s: &str) {
        self.sql.push_str(&s.replace(PLACEHOLDER, ESCAPED_PLACEHOLDER));
    }

    /// Append a bound value. Must be paired with one [`PLACEHOLDER`] in the text.
    pub fn write_value(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Append one placeholder marker and its value.
    pub fn push_bind(&mut self, value: Value) {
        self.sql.push_str(PLACEHOLDER);
        self.values.push(value);
    }

    /// Accumulated text.
    pub fn as_str(&self) -> &str {
        &self.sql
    }

    /// Bound values in placeholder order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of unescaped placeholder markers in the text.
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    /// Consume the buffer into its text and values.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.values)
    }
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Count `?` markers, treating `??` as an escaped literal.
pub(crate) fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'?' {
            if bytes.get(i + 1) == Some(&b'?') {
                i += 2;
                continue;
            }
            count += 1;
        }
        i += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_bind_pairs_marker_and_value() {
        let mut buf = Buffer::new();
        buf.write_str("a = ");
        buf.push_bind(Value::Int(1));
        buf.write_str(" AND b = ");
        buf.push_bind(Value::Int(2));
        assert_eq!(buf.as_str(), "a = ? AND b = ?");
        assert_eq!(buf.values(), &[Value::Int(1), Value::Int(2)]);
        assert_eq!(buf.placeholder_count(), 2);
    }

    #[test]
    fn test_escaped_markers_not_counted() {
        assert_eq!(count_placeholders("data ?? 'k' AND id = ?"), 1);
        assert_eq!(count_placeholders("???"), 1);
        assert_eq!(count_placeholders(""), 0);
    }
}
