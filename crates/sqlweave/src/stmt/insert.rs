//! INSERT statement builder.

use super::{Statement, build_returning, expand_star, to_strings, write_ident_list};
use crate::buffer::Buffer;
use crate::builder::{Builder, Comments, Raw};
use crate::dialect::Dialect;
use crate::error::{SqlError, SqlResult};
use crate::row::Schema;
use crate::value::Value;

/// INSERT statement, single- or multi-row.
#[derive(Clone, Debug, Default)]
pub struct InsertStmt {
    raw: Option<Raw>,
    comments: Comments,
    table: String,
    ignore: bool,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    returning: Vec<String>,
}

/// `INSERT INTO table`
pub fn insert_into(table: impl Into<String>) -> InsertStmt {
    InsertStmt {
        table: table.into(),
        ..Default::default()
    }
}

/// INSERT from hand-written SQL; structured fields are ignored.
pub fn insert_by_sql<T: Into<Value>>(
    query: impl Into<String>,
    values: impl IntoIterator<Item = T>,
) -> InsertStmt {
    InsertStmt {
        raw: Some(Raw::new(query, values)),
        ..Default::default()
    }
}

impl InsertStmt {
    /// Set the column list.
    pub fn columns<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.columns = to_strings(cols);
        self
    }

    /// Append one row of values. Call repeatedly for a multi-row insert.
    ///
    /// Mixed-type rows are written as a `Vec<Value>`:
    ///
    /// ```ignore
    /// insert_into("users")
    ///     .columns(["name", "age"])
    ///     .values(vec![Value::from("alice"), Value::from(30)]);
    /// ```
    pub fn values<T: Into<Value>>(mut self, row: impl IntoIterator<Item = T>) -> Self {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Append a column and its value to the first row.
    pub fn pair(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.push(column.into());
        match self.rows.first_mut() {
            Some(row) => row.push(value.into()),
            None => self.rows.push(vec![value.into()]),
        }
        self
    }

    /// `INSERT IGNORE INTO ...`
    pub fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }

    /// RETURNING columns. A lone `*` is expanded against the load destination.
    pub fn returning<S: Into<String>>(mut self, cols: impl IntoIterator<Item = S>) -> Self {
        self.returning = to_strings(cols);
        self
    }

    /// Prepend a `/* comment */` line.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn validate(&self) -> SqlResult<()> {
        if self.table.is_empty() {
            return Err(SqlError::TableNotSpecified);
        }
        if self.columns.is_empty() {
            return Err(SqlError::ColumnNotSpecified);
        }
        if self.rows.is_empty() {
            return Err(SqlError::ValuesNotSpecified);
        }
        if let Some(row) = self.rows.iter().find(|r| r.len() != self.columns.len()) {
            return Err(SqlError::ValueCountMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        Ok(())
    }
}

impl Builder for InsertStmt {
    fn build(&self, d: &dyn Dialect, buf: &mut Buffer) -> SqlResult<()> {
        if let Some(raw) = &self.raw {
            return raw.build(d, buf);
        }
        self.validate()?;

        self.comments.build(d, buf)?;
        buf.write_str(if self.ignore {
            "INSERT IGNORE INTO "
        } else {
            "INSERT INTO "
        });
        buf.write_str(&d.quote_ident(&self.table));
        buf.write_str(" (");
        write_ident_list(d, buf, &self.columns, ",");
        buf.write_str(") VALUES ");
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            buf.write_str("(");
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    buf.write_str(",");
                }
                buf.push_bind(v.clone());
            }
            buf.write_str(")");
        }
        build_returning(d, buf, &self.returning);
        Ok(())
    }
}

impl Statement for InsertStmt {
    fn expand_returning(&self, schema: &Schema) -> Option<Self> {
        let returning = expand_star(&self.returning, schema)?;
        Some(Self {
            returning,
            ..self.clone()
        })
    }
}
