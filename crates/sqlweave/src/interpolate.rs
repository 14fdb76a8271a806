//! The placeholder pass: turns neutral `?` markers into dialect placeholders or literals.
//!
//! Builders always write `?`. Right before execution the text is walked once, so each marker
//! becomes `d.placeholder(n)` (numbered over the values that stay bound) or, when
//! interpolating, the value's literal encoding. `??` collapses to a literal `?`.

use crate::buffer::Buffer;
use crate::builder::Builder;
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;

/// Final SQL text plus the values still bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub values: Vec<Value>,
}

/// Build `builder` and run the placeholder pass.
///
/// With `interpolate` set every value is inlined as a literal, except bytes and non-finite
/// floats, which have no portable literal and stay bound.
pub fn compile(
    builder: &(impl Builder + ?Sized),
    d: &dyn Dialect,
    interpolate: bool,
) -> SqlResult<Compiled> {
    let mut buf = Buffer::new();
    builder.build(d, &mut buf)?;
    let (sql, values) = buf.into_parts();
    rewrite(&sql, values, d, |v| match v {
        Value::Bytes(_) => None,
        Value::Float(f) if !f.is_finite() => None,
        v if interpolate => Some(literal(d, v)),
        _ => None,
    })
}

/// Inline every value of an already built `sql` as a literal.
///
/// For logging and for drivers without parameter binding. Non-finite floats have no SQL
/// literal and are rejected.
pub fn interpolate_for_dialect(sql: &str, values: &[Value], d: &dyn Dialect) -> SqlResult<String> {
    if let Some(f) = values.iter().find_map(|v| match v {
        Value::Float(f) if !f.is_finite() => Some(f),
        _ => None,
    }) {
        return Err(SqlError::validation(format!("{f} cannot be written as a SQL literal")));
    }
    let compiled = rewrite(sql, values.to_vec(), d, |v| Some(literal(d, v)))?;
    Ok(compiled.sql)
}

/// Literal encoding of one value.
pub fn literal(d: &dyn Dialect, v: &Value) -> String {
    match v {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => d.encode_bool(*b),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Text(s) => d.encode_string(s),
        Value::Bytes(b) => d.encode_bytes(b),
        Value::Time(t) => d.encode_time(t),
        Value::Json(j) => d.encode_string(&j.to_string()),
        Value::Uuid(u) => d.encode_string(&u.to_string()),
    }
}

fn rewrite(
    sql: &str,
    values: Vec<Value>,
    d: &dyn Dialect,
    inline: impl Fn(&Value) -> Option<String>,
) -> SqlResult<Compiled> {
    let markers = crate::buffer::count_placeholders(sql);
    if markers != values.len() {
        return Err(SqlError::PlaceholderCount {
            markers,
            values: values.len(),
        });
    }

    let mut out = String::with_capacity(sql.len() + values.len() * 2);
    let mut bound = Vec::with_capacity(values.len());
    let mut values = values.into_iter();
    let mut rest = sql;
    while let Some(idx) = rest.find('?') {
        out.push_str(&rest[..idx]);
        if rest[idx + 1..].starts_with('?') {
            out.push('?');
            rest = &rest[idx + 2..];
            continue;
        }
        rest = &rest[idx + 1..];

        let Some(value) = values.next() else {
            return Err(SqlError::PlaceholderCount {
                markers,
                values: bound.len(),
            });
        };
        match inline(&value) {
            Some(text) => out.push_str(&text),
            None => {
                out.push_str(&d.placeholder(bound.len()));
                bound.push(value);
            }
        }
    }
    out.push_str(rest);

    Ok(Compiled {
        sql: out,
        values: bound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{eq, expr};
    use crate::dialect::{MSSQL, MYSQL, POSTGRES};
    use crate::stmt::{delete_from, update};
    use chrono::TimeZone;

    #[test]
    fn test_postgres_numbering_spans_fragments() {
        let stmt = update("t")
            .set("a", 1)
            .where_(expr("b = ? OR c = ?", [2, 3]))
            .where_(eq("d", 4));
        let compiled = compile(&stmt, POSTGRES, false).unwrap();
        assert_eq!(
            compiled.sql,
            r#"UPDATE "t" SET "a" = $1 WHERE (b = $2 OR c = $3) AND ("d" = $4)"#
        );
        assert_eq!(compiled.values.len(), 4);
    }

    #[test]
    fn test_mysql_keeps_question_marks() {
        let compiled = compile(&delete_from("t").where_(eq("a", 1)), MYSQL, false).unwrap();
        assert_eq!(compiled.sql, "DELETE FROM `t` WHERE (`a` = ?)");
        assert_eq!(compiled.values, vec![Value::Int(1)]);
    }

    #[test]
    fn test_mssql_placeholders() {
        let compiled = compile(&update("t").set("a", 1).set("b", 2), MSSQL, false).unwrap();
        assert_eq!(compiled.sql, "UPDATE [t] SET [a] = @p1, [b] = @p2");
    }

    #[test]
    fn test_interpolate_inlines_literals_but_binds_bytes() {
        let stmt = update("t")
            .set("name", "O'Brien")
            .set("blob", vec![1u8, 2])
            .set("flag", true)
            .where_(eq("id", 7));
        let compiled = compile(&stmt, POSTGRES, true).unwrap();
        assert_eq!(
            compiled.sql,
            r#"UPDATE "t" SET "name" = 'O''Brien', "blob" = $1, "flag" = TRUE WHERE ("id" = 7)"#
        );
        assert_eq!(compiled.values, vec![Value::Bytes(vec![1, 2])]);
    }

    #[test]
    fn test_escaped_marker_collapses() {
        let stmt = delete_from("t").where_(expr("data ?? 'k' AND id = ?", [1]));
        let compiled = compile(&stmt, POSTGRES, false).unwrap();
        assert_eq!(compiled.sql, r#"DELETE FROM "t" WHERE (data ? 'k' AND id = $1)"#);
    }

    #[test]
    fn test_interpolate_for_dialect() {
        let t = chrono::Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let values = vec![
            Value::Null,
            Value::from(1.5),
            Value::from(t),
            Value::from(vec![0xffu8]),
        ];
        let sql = interpolate_for_dialect("VALUES (?, ?, ?, ?)", &values, MYSQL).unwrap();
        assert_eq!(sql, "VALUES (NULL, 1.5, '2024-05-06 07:08:09.000000', 0xff)");
    }

    #[test]
    fn test_non_finite_floats_stay_bound() {
        let stmt = update("t")
            .set("a", f64::NAN)
            .set("b", 1.5)
            .where_(eq("c", f64::INFINITY));
        let compiled = compile(&stmt, POSTGRES, true).unwrap();
        assert_eq!(compiled.sql, r#"UPDATE "t" SET "a" = $1, "b" = 1.5 WHERE ("c" = $2)"#);
        assert_eq!(compiled.values.len(), 2);
        assert!(matches!(compiled.values[0], Value::Float(f) if f.is_nan()));
        assert_eq!(compiled.values[1], Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_interpolate_for_dialect_rejects_non_finite_floats() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = interpolate_for_dialect("SELECT ?", &[Value::Float(f)], MYSQL).unwrap_err();
            assert!(matches!(err, SqlError::Validation(_)), "{f}: {err}");
        }
        assert_eq!(
            interpolate_for_dialect("SELECT ?", &[Value::Float(0.25)], MYSQL).unwrap(),
            "SELECT 0.25"
        );
    }

    #[test]
    fn test_marker_value_mismatch() {
        let err = interpolate_for_dialect("a = ? AND b = ?", &[Value::Int(1)], MYSQL).unwrap_err();
        assert!(matches!(
            err,
            SqlError::PlaceholderCount {
                markers: 2,
                values: 1
            }
        ));
    }
}
