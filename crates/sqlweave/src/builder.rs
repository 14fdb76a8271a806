//! The `Builder` contract and the leaf builders every statement is made of.

use crate::buffer::{Buffer, ESCAPED_PLACEHOLDER, count_placeholders};
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;
use std::sync::Arc;

/// Anything that can serialize itself into SQL text plus bound values.
///
/// Implementations write `?` markers through [`Buffer::push_bind`] and quote identifiers
/// through the dialect. Building must not mutate `self`, so building the same value twice
/// yields identical output.
pub trait Builder: Send + Sync {
    /// Serialize into `buf` using dialect `d`.
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()>;
}

impl<B: Builder + ?Sized> Builder for &B {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        (**self).build(d, buf)
    }
}

impl<B: Builder + ?Sized> Builder for Box<B> {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        (**self).build(d, buf)
    }
}

impl<B: Builder + ?Sized> Builder for Arc<B> {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        (**self).build(d, buf)
    }
}

/// A shared, clone-friendly nested builder (usually a subquery).
#[derive(Clone)]
pub struct SubQuery(Arc<dyn Builder>);

impl SubQuery {
    /// Wrap any builder.
    pub fn new<B: Builder + 'static>(builder: B) -> Self {
        SubQuery(Arc::new(builder))
    }

    /// Build wrapped in parentheses.
    pub(crate) fn build_parenthesized(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        buf.write_str("(");
        self.0.build(d, buf)?;
        buf.write_str(")");
        Ok(())
    }
}

impl Builder for SubQuery {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        self.0.build(d, buf)
    }
}

impl std::fmt::Debug for SubQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SubQuery").field(&"<dyn Builder>").finish()
    }
}

/// An argument bound to one `?` of a raw template.
#[derive(Clone, Debug)]
pub enum Arg {
    /// A single bound value.
    Value(Value),
    /// A list, expanded to `(?,?,...)`.
    List(Vec<Value>),
    /// A nested builder, built in place inside parentheses.
    Sub(SubQuery),
}

impl Arg {
    /// Single value argument.
    pub fn value(v: impl Into<Value>) -> Self {
        Arg::Value(v.into())
    }

    /// List argument, for `col IN ?` style templates.
    pub fn list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Arg::List(values.into_iter().map(Into::into).collect())
    }

    /// Subquery argument.
    pub fn sub<B: Builder + 'static>(builder: B) -> Self {
        Arg::Sub(SubQuery::new(builder))
    }

    fn write(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        match self {
            Arg::Value(v) => buf.push_bind(v.clone()),
            Arg::List(values) => {
                if values.is_empty() {
                    return Err(SqlError::validation("empty list bound to placeholder"));
                }
                buf.write_str("(");
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        buf.write_str(",");
                    }
                    buf.push_bind(v.clone());
                }
                buf.write_str(")");
            }
            Arg::Sub(sub) => sub.build_parenthesized(d, buf)?,
        }
        Ok(())
    }
}

/// Hand-written SQL with `?` markers and their arguments.
///
/// Used both for raw WHERE fragments ([`crate::expr`]) and for the raw-query override of
/// statements (`*_by_sql`). Markers are bound to arguments left to right; `??` passes a
/// literal `?` through.
#[derive(Clone, Debug, Default)]
pub struct Raw {
    query: String,
    args: Vec<Arg>,
}

impl Raw {
    /// Template with plain values.
    pub fn new<T: Into<Value>>(
        query: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            query: query.into(),
            args: values.into_iter().map(|v| Arg::Value(v.into())).collect(),
        }
    }

    /// Template with mixed value/list/subquery arguments.
    pub fn with_args(query: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            query: query.into(),
            args,
        }
    }

    /// Template without arguments.
    pub fn sql(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            args: Vec::new(),
        }
    }

    /// Whether no query text was set.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl Builder for Raw {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        let markers = count_placeholders(&self.query);
        if markers != self.args.len() {
            return Err(SqlError::PlaceholderCount {
                markers,
                values: self.args.len(),
            });
        }

        let mut args = self.args.iter();
        let mut rest = self.query.as_str();
        while let Some(idx) = rest.find('?') {
            buf.write_str(&rest[..idx]);
            if rest[idx..].starts_with(ESCAPED_PLACEHOLDER) {
                buf.write_str(ESCAPED_PLACEHOLDER);
                rest = &rest[idx + ESCAPED_PLACEHOLDER.len()..];
                continue;
            }
            rest = &rest[idx + 1..];
            match args.next() {
                Some(arg) => arg.write(d, buf)?,
                None => {
                    return Err(SqlError::PlaceholderCount {
                        markers,
                        values: self.args.len(),
                    });
                }
            }
        }
        buf.write_str(rest);
        Ok(())
    }
}

/// Ordered SQL comment annotations emitted before a statement.
#[derive(Clone, Debug, Default)]
pub struct Comments(Vec<String>);

impl Comments {
    pub fn push(&mut self, comment: impl Into<String>) {
        self.0.push(comment.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Builder for Comments {
    fn build(&self, _d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        for comment in &self.0 {
            buf.write_str("/* ");
            // Delimiters are split so the comment can neither end early nor nest; `?` must not
            // count as a marker.
            let text = comment
                .replace("*/", "* /")
                .replace("/*", "/ *")
                .replace('?', ESCAPED_PLACEHOLDER);
            buf.write_str(&text);
            buf.write_str(" */\n");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MYSQL, POSTGRES};

    fn built(b: &impl Builder) -> SqlResult<(String, Vec<Value>)> {
        let mut buf = Buffer::new();
        b.build(POSTGRES, &mut buf)?;
        Ok(buf.into_parts())
    }

    #[test]
    fn test_raw_binds_values_in_order() {
        let (sql, values) = built(&Raw::new("a = ? OR b = ?", [1, 2])).unwrap();
        assert_eq!(sql, "a = ? OR b = ?");
        assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_raw_expands_list_and_subquery() {
        let inner = Raw::new("SELECT id FROM t WHERE x = ?", ["y"]);
        let raw = Raw::with_args(
            "a IN ? AND b IN ?",
            vec![Arg::list([1, 2, 3]), Arg::sub(inner)],
        );
        let (sql, values) = built(&raw).unwrap();
        assert_eq!(sql, "a IN (?,?,?) AND b IN (SELECT id FROM t WHERE x = ?)");
        assert_eq!(values.len(), 4);
        assert_eq!(values[3], Value::Text("y".into()));
    }

    #[test]
    fn test_raw_keeps_escaped_marker() {
        let (sql, values) = built(&Raw::new("data ?? 'k' AND id = ?", [7])).unwrap();
        assert_eq!(sql, "data ?? 'k' AND id = ?");
        assert_eq!(values, vec![Value::Int(7)]);
    }

    #[test]
    fn test_raw_count_mismatch() {
        let err = built(&Raw::new("a = ? AND b = ?", [1])).unwrap_err();
        assert!(matches!(
            err,
            SqlError::PlaceholderCount {
                markers: 2,
                values: 1
            }
        ));
    }

    #[test]
    fn test_raw_empty_list_rejected() {
        let raw = Raw::with_args("a IN ?", vec![Arg::List(vec![])]);
        assert!(matches!(built(&raw), Err(SqlError::Validation(_))));
    }

    #[test]
    fn test_comments_are_dialect_independent() {
        let mut comments = Comments::default();
        comments.push("first");
        comments.push("evil */ DROP");
        comments.push("why?");
        let mut a = Buffer::new();
        let mut b = Buffer::new();
        comments.build(POSTGRES, &mut a).unwrap();
        comments.build(MYSQL, &mut b).unwrap();
        assert_eq!(a.as_str(), "/* first */\n/* evil * / DROP */\n/* why?? */\n");
        assert_eq!(a.placeholder_count(), 0);
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_comment_openers_are_neutralized() {
        let mut comments = Comments::default();
        comments.push("see /* note");
        comments.push("/*/");
        let mut buf = Buffer::new();
        comments.build(POSTGRES, &mut buf).unwrap();
        assert_eq!(buf.as_str(), "/* see / * note */\n/* / * / */\n");
    }
}
