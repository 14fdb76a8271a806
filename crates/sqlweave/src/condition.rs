//! Composable boolean conditions for WHERE/HAVING/JOIN ON.
//!
//! Leaves compile to `"col" op ?` with one bound value per operand; AND/OR groups wrap
//! every child in parentheses so precedence never depends on nesting.
//!
//! ```ignore
//! use sqlweave::{and, eq, gt, or};
//!
//! let cond = and([eq("status", "active"), or([eq("role", "admin"), gt("karma", 100)])]);
//! // ("status" = ?) AND (("role" = ?) OR ("karma" > ?))
//! ```

use crate::buffer::Buffer;
use crate::builder::{Arg, Builder, Raw, SubQuery};
use crate::dialect::Dialect;
use crate::error::SqlResult;
use crate::value::Value;

/// Right-hand side of a comparison.
#[derive(Clone, Debug)]
pub enum Operand {
    Value(Value),
    List(Vec<Value>),
    Sub(SubQuery),
}

/// A condition tree node.
#[derive(Clone, Debug)]
pub enum Condition {
    /// All children must hold. Empty builds `1=1`.
    And(Vec<Condition>),
    /// At least one child must hold. Empty builds `1=0`.
    Or(Vec<Condition>),
    /// Negation of the inner condition.
    Not(Box<Condition>),
    /// `col op ?`
    Compare {
        column: String,
        op: &'static str,
        value: Value,
    },
    /// `col IS [NOT] NULL`
    NullCheck { column: String, is_null: bool },
    /// `col [NOT] IN (...)`
    In {
        column: String,
        operand: Operand,
        negated: bool,
    },
    /// `col [NOT] BETWEEN ? AND ?`
    Between {
        column: String,
        from: Value,
        to: Value,
        negated: bool,
    },
    /// Hand-written fragment with its own placeholders.
    Expr(Raw),
}

impl Condition {
    /// Wrap this condition and `other` in an AND group.
    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut children) => {
                children.push(other);
                Condition::And(children)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    /// Wrap this condition and `other` in an OR group.
    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut children) => {
                children.push(other);
                Condition::Or(children)
            }
            first => Condition::Or(vec![first, other]),
        }
    }
}

impl std::ops::Not for Condition {
    type Output = Condition;

    fn not(self) -> Self::Output {
        Condition::Not(Box::new(self))
    }
}

fn compare(column: impl Into<String>, op: &'static str, value: impl Into<Value>) -> Condition {
    Condition::Compare {
        column: column.into(),
        op,
        value: value.into(),
    }
}

/// `column = value`; a NULL value builds `column IS NULL`.
pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    let value = value.into();
    if value.is_null() {
        return is_null(column);
    }
    compare(column, "=", value)
}

/// `column != value`; a NULL value builds `column IS NOT NULL`.
pub fn neq(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    let value = value.into();
    if value.is_null() {
        return is_not_null(column);
    }
    compare(column, "!=", value)
}

/// `column > value`
pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, ">", value)
}

/// `column >= value`
pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, ">=", value)
}

/// `column < value`
pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, "<", value)
}

/// `column <= value`
pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Condition {
    compare(column, "<=", value)
}

/// `column LIKE pattern`
pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Condition {
    compare(column, "LIKE", pattern)
}

/// `column NOT LIKE pattern`
pub fn not_like(column: impl Into<String>, pattern: impl Into<Value>) -> Condition {
    compare(column, "NOT LIKE", pattern)
}

/// `column IS NULL`
pub fn is_null(column: impl Into<String>) -> Condition {
    Condition::NullCheck {
        column: column.into(),
        is_null: true,
    }
}

/// `column IS NOT NULL`
pub fn is_not_null(column: impl Into<String>) -> Condition {
    Condition::NullCheck {
        column: column.into(),
        is_null: false,
    }
}

/// `column IN (values...)`; an empty list builds `1=0`.
pub fn in_list<T: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> Condition {
    Condition::In {
        column: column.into(),
        operand: Operand::List(values.into_iter().map(Into::into).collect()),
        negated: false,
    }
}

/// `column NOT IN (values...)`; an empty list builds `1=1`.
pub fn not_in<T: Into<Value>>(
    column: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> Condition {
    Condition::In {
        column: column.into(),
        operand: Operand::List(values.into_iter().map(Into::into).collect()),
        negated: true,
    }
}

/// `column IN (subquery)`
pub fn in_subquery<B: Builder + 'static>(column: impl Into<String>, query: B) -> Condition {
    Condition::In {
        column: column.into(),
        operand: Operand::Sub(SubQuery::new(query)),
        negated: false,
    }
}

/// `column NOT IN (subquery)`
pub fn not_in_subquery<B: Builder + 'static>(column: impl Into<String>, query: B) -> Condition {
    Condition::In {
        column: column.into(),
        operand: Operand::Sub(SubQuery::new(query)),
        negated: true,
    }
}

/// `column BETWEEN from AND to`
pub fn between(
    column: impl Into<String>,
    from: impl Into<Value>,
    to: impl Into<Value>,
) -> Condition {
    Condition::Between {
        column: column.into(),
        from: from.into(),
        to: to.into(),
        negated: false,
    }
}

/// `column NOT BETWEEN from AND to`
pub fn not_between(
    column: impl Into<String>,
    from: impl Into<Value>,
    to: impl Into<Value>,
) -> Condition {
    Condition::Between {
        column: column.into(),
        from: from.into(),
        to: to.into(),
        negated: true,
    }
}

/// AND group.
pub fn and(conds: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::And(conds.into_iter().collect())
}

/// OR group.
pub fn or(conds: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Or(conds.into_iter().collect())
}

/// NOT.
pub fn not(cond: Condition) -> Condition {
    Condition::Not(Box::new(cond))
}

/// Raw fragment with `?` placeholders bound to `values`.
///
/// # Example
/// ```ignore
/// let cond = sqlweave::expr("lower(email) = lower(?)", ["A@B.C"]);
/// ```
pub fn expr<T: Into<Value>>(
    sql: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> Condition {
    Condition::Expr(Raw::new(sql, values))
}

/// Raw fragment with mixed value/list/subquery arguments.
pub fn expr_args(sql: impl Into<String>, args: Vec<Arg>) -> Condition {
    Condition::Expr(Raw::with_args(sql, args))
}

/// Build `conds` as one AND group, the way WHERE and HAVING lists are combined.
pub(crate) fn build_and(d: &dyn Dialect, buf: &mut Buffer, conds: &[Condition]) -> SqlResult<()> {
    build_group(d, buf, conds, " AND ", "1=1")
}

fn build_group(
    d: &dyn Dialect,
    buf: &mut Buffer,
    children: &[Condition],
    joiner: &str,
    empty: &str,
) -> SqlResult<()> {
    if children.is_empty() {
        buf.write_str(empty);
        return Ok(());
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            buf.write_str(joiner);
        }
        buf.write_str("(");
        child.build(d, buf)?;
        buf.write_str(")");
    }
    Ok(())
}

impl Builder for Condition {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        match self {
            Condition::And(children) => build_and(d, buf, children),
            Condition::Or(children) => build_group(d, buf, children, " OR ", "1=0"),
            Condition::Not(inner) => {
                buf.write_str("NOT (");
                inner.build(d, buf)?;
                buf.write_str(")");
                Ok(())
            }
            Condition::Compare { column, op, value } => {
                buf.write_str(&d.quote_ident(column));
                buf.write_str(" ");
                buf.write_str(op);
                buf.write_str(" ");
                buf.push_bind(value.clone());
                Ok(())
            }
            Condition::NullCheck { column, is_null } => {
                buf.write_str(&d.quote_ident(column));
                buf.write_str(if *is_null { " IS NULL" } else { " IS NOT NULL" });
                Ok(())
            }
            Condition::In {
                column,
                operand,
                negated,
            } => {
                if let Operand::List(values) = operand
                    && values.is_empty()
                {
                    buf.write_str(if *negated { "1=1" } else { "1=0" });
                    return Ok(());
                }
                buf.write_str(&d.quote_ident(column));
                buf.write_str(if *negated { " NOT IN " } else { " IN " });
                match operand {
                    Operand::Value(v) => {
                        buf.write_str("(");
                        buf.push_bind(v.clone());
                        buf.write_str(")");
                    }
                    Operand::List(values) => {
                        buf.write_str("(");
                        for (i, v) in values.iter().enumerate() {
                            if i > 0 {
                                buf.write_str(",");
                            }
                            buf.push_bind(v.clone());
                        }
                        buf.write_str(")");
                    }
                    Operand::Sub(sub) => sub.build_parenthesized(d, buf)?,
                }
                Ok(())
            }
            Condition::Between {
                column,
                from,
                to,
                negated,
            } => {
                buf.write_str(&d.quote_ident(column));
                buf.write_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                buf.push_bind(from.clone());
                buf.write_str(" AND ");
                buf.push_bind(to.clone());
                Ok(())
            }
            Condition::Expr(raw) => raw.build(d, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MYSQL, POSTGRES};

    fn built(c: &Condition) -> (String, Vec<Value>) {
        let mut buf = Buffer::new();
        c.build(MYSQL, &mut buf).unwrap();
        assert_eq!(buf.placeholder_count(), buf.values().len());
        buf.into_parts()
    }

    #[test]
    fn test_leaf_compare() {
        let (sql, values) = built(&eq("a", 1));
        assert_eq!(sql, "`a` = ?");
        assert_eq!(values, vec![Value::Int(1)]);
        assert_eq!(built(&gte("t.b", 2)).0, "`t`.`b` >= ?");
        assert_eq!(built(&not_like("c", "x%")).0, "`c` NOT LIKE ?");
    }

    #[test]
    fn test_null_operand_becomes_null_check() {
        assert_eq!(built(&eq("a", None::<i64>)).0, "`a` IS NULL");
        assert_eq!(built(&neq("a", None::<i64>)).0, "`a` IS NOT NULL");
        assert!(built(&eq("a", None::<i64>)).1.is_empty());
    }

    #[test]
    fn test_empty_in_is_tautology() {
        assert_eq!(built(&in_list("a", Vec::<i64>::new())).0, "1=0");
        assert_eq!(built(&not_in("a", Vec::<i64>::new())).0, "1=1");
    }

    #[test]
    fn test_in_list() {
        let (sql, values) = built(&in_list("a", [1, 2, 3]));
        assert_eq!(sql, "`a` IN (?,?,?)");
        assert_eq!(values.len(), 3);
        assert_eq!(built(&not_in("a", ["x"])).0, "`a` NOT IN (?)");
    }

    #[test]
    fn test_between() {
        let (sql, values) = built(&between("age", 18, 65));
        assert_eq!(sql, "`age` BETWEEN ? AND ?");
        assert_eq!(values, vec![Value::Int(18), Value::Int(65)]);
        assert_eq!(built(&not_between("age", 1, 2)).0, "`age` NOT BETWEEN ? AND ?");
    }

    #[test]
    fn test_nested_groups_parenthesize_every_child() {
        let cond = and([
            eq("status", "active"),
            or([eq("role", "admin"), and([eq("role", "user"), gt("rep", 100)])]),
        ]);
        let (sql, values) = built(&cond);
        assert_eq!(
            sql,
            "(`status` = ?) AND ((`role` = ?) OR ((`role` = ?) AND (`rep` > ?)))"
        );
        assert_eq!(
            values,
            vec![
                Value::Text("active".into()),
                Value::Text("admin".into()),
                Value::Text("user".into()),
                Value::Int(100)
            ]
        );
    }

    #[test]
    fn test_empty_groups_are_identity() {
        assert_eq!(built(&and(Vec::new())).0, "1=1");
        assert_eq!(built(&or(Vec::new())).0, "1=0");
    }

    #[test]
    fn test_not() {
        assert_eq!(built(&not(eq("a", 1))).0, "NOT (`a` = ?)");
        assert_eq!(built(&!is_null("a")).0, "NOT (`a` IS NULL)");
    }

    #[test]
    fn test_chaining_flattens() {
        let cond = eq("a", 1).and(eq("b", 2)).and(eq("c", 3));
        assert_eq!(built(&cond).0, "(`a` = ?) AND (`b` = ?) AND (`c` = ?)");
        let cond = eq("a", 1).or(eq("b", 2));
        assert_eq!(built(&cond).0, "(`a` = ?) OR (`b` = ?)");
    }

    #[test]
    fn test_expr_inside_group() {
        let cond = and([eq("a", 1), expr("b = ? OR c = ?", [2, 3])]);
        let mut buf = Buffer::new();
        cond.build(POSTGRES, &mut buf).unwrap();
        assert_eq!(buf.as_str(), r#"("a" = ?) AND (b = ? OR c = ?)"#);
        assert_eq!(buf.values().len(), 3);
    }

    #[test]
    fn test_in_subquery() {
        let sub = Raw::new("SELECT id FROM banned WHERE reason = ?", ["spam"]);
        let (sql, values) = built(&in_subquery("id", sub));
        assert_eq!(sql, "`id` IN (SELECT id FROM banned WHERE reason = ?)");
        assert_eq!(values.len(), 1);
    }
}
