//! Driver-neutral rows, row decoding, and load destinations.

use crate::error::{SqlError, SqlResult};
use crate::value::{FromValue, Value};
use heck::ToSnakeCase;
use std::sync::Arc;

/// One result row: column names (shared by every row of a result set) and their values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value of `column`, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Decode the value of `column`, returning [`SqlError::Decode`] on failure.
    pub fn try_get<T: FromValue>(&self, column: &str) -> SqlResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| SqlError::decode(column, "column not found"))?;
        T::from_value(value).map_err(|message| SqlError::decode(column, message))
    }

    /// Decode the value at position `idx`.
    pub fn try_get_at<T: FromValue>(&self, idx: usize) -> SqlResult<T> {
        let column = self
            .columns
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("#{idx}"));
        let value = self
            .values
            .get(idx)
            .ok_or_else(|| SqlError::decode(column.as_str(), "column index out of range"))?;
        T::from_value(value).map_err(|message| SqlError::decode(column, message))
    }
}

/// Convert tokio-postgres rows, sharing one column-name list across the result set.
pub(crate) fn rows_from_pg(rows: Vec<tokio_postgres::Row>) -> SqlResult<Vec<Row>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let columns: Arc<[String]> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    rows.iter()
        .map(|row| {
            let values = (0..columns.len())
                .map(|i| {
                    row.try_get::<_, Value>(i)
                        .map_err(|e| SqlError::decode(columns[i].as_str(), e.to_string()))
                })
                .collect::<SqlResult<Vec<_>>>()?;
            Ok(Row::new(Arc::clone(&columns), values))
        })
        .collect()
}

/// A destination field and the column it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub column: Option<&'static str>,
}

impl Field {
    pub const fn new(name: &'static str) -> Self {
        Self { name, column: None }
    }

    pub const fn with_column(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column: Some(column),
        }
    }

    /// Column name: the explicit override, or the snake_case form of the field name.
    pub fn column_name(&self) -> String {
        match self.column {
            Some(column) => column.to_string(),
            None => self.name.to_snake_case(),
        }
    }
}

/// Ordered field list of a load destination, used to expand `RETURNING *`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in field order.
    pub fn columns(&self) -> Vec<String> {
        self.fields.iter().map(Field::column_name).collect()
    }
}

/// Trait for converting a result row into a Rust value.
///
/// Usually derived with `#[derive(FromRow)]`, which also fills in [`FromRow::schema`].
///
/// # Example
///
/// ```ignore
/// use sqlweave::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     email: Option<String>,
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a row into Self.
    fn from_row(row: &Row) -> SqlResult<Self>;

    /// Fields this type decodes, in order. Empty for scalars.
    fn schema() -> Schema {
        Schema::default()
    }
}

macro_rules! impl_from_row_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromRow for $t {
                fn from_row(row: &Row) -> SqlResult<Self> {
                    row.try_get_at(0)
                }
            }
        )*
    };
}

impl_from_row_scalar!(
    Value,
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    String,
    Vec<u8>,
    chrono::DateTime<chrono::Utc>,
    chrono::NaiveDateTime,
    serde_json::Value,
    uuid::Uuid,
);

impl<T: FromValue> FromRow for Option<T> {
    fn from_row(row: &Row) -> SqlResult<Self> {
        row.try_get_at(0)
    }
}

/// A destination rows can be loaded into.
pub trait Load: Send {
    /// Schema used to expand `RETURNING *`.
    fn schema(&self) -> Schema;

    /// Decode `rows` into self and return how many rows were consumed.
    fn load(&mut self, rows: Vec<Row>) -> SqlResult<usize>;
}

impl<T: FromRow + Send> Load for Vec<T> {
    fn schema(&self) -> Schema {
        T::schema()
    }

    fn load(&mut self, rows: Vec<Row>) -> SqlResult<usize> {
        self.reserve(rows.len());
        for row in &rows {
            self.push(T::from_row(row)?);
        }
        Ok(rows.len())
    }
}

/// Single-row destination: keeps the first row, ignores the rest.
impl<T: FromRow + Send> Load for Option<T> {
    fn schema(&self) -> Schema {
        T::schema()
    }

    fn load(&mut self, rows: Vec<Row>) -> SqlResult<usize> {
        match rows.first() {
            Some(row) => {
                *self = Some(T::from_row(row)?);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cols: &[&str], values: Vec<Value>) -> Row {
        let columns: Arc<[String]> = cols.iter().map(|c| c.to_string()).collect();
        Row::new(columns, values)
    }

    struct Pair {
        id: i64,
        name: Option<String>,
    }

    impl FromRow for Pair {
        fn from_row(row: &Row) -> SqlResult<Self> {
            Ok(Self {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        }

        fn schema() -> Schema {
            Schema::new(vec![Field::new("id"), Field::with_column("name", "full_name")])
        }
    }

    #[test]
    fn test_try_get_by_name_and_index() {
        let r = row(&["id", "name"], vec![Value::Int(3), Value::Null]);
        assert_eq!(r.try_get::<i64>("id").unwrap(), 3);
        assert_eq!(r.try_get::<Option<String>>("name").unwrap(), None);
        assert_eq!(r.try_get_at::<i32>(0).unwrap(), 3);
    }

    #[test]
    fn test_try_get_missing_column_is_decode_error() {
        let r = row(&["id"], vec![Value::Int(3)]);
        let err = r.try_get::<i64>("nope").unwrap_err();
        assert!(matches!(err, SqlError::Decode { ref column, .. } if column == "nope"));
    }

    #[test]
    fn test_schema_column_fallback_is_snake_case() {
        assert_eq!(Field::new("createdAt").column_name(), "created_at");
        assert_eq!(Field::with_column("x", "X_COL").column_name(), "X_COL");
        assert_eq!(Pair::schema().columns(), vec!["id", "full_name"]);
    }

    #[test]
    fn test_load_vec_and_option() {
        let rows = vec![
            row(&["id", "name"], vec![Value::Int(1), Value::Text("a".into())]),
            row(&["id", "name"], vec![Value::Int(2), Value::Null]),
        ];

        let mut all: Vec<Pair> = Vec::new();
        assert_eq!(all.load(rows.clone()).unwrap(), 2);
        assert_eq!(all[1].id, 2);
        assert_eq!(all[0].name.as_deref(), Some("a"));

        let mut first: Option<Pair> = None;
        assert_eq!(first.load(rows).unwrap(), 1);
        assert_eq!(first.map(|p| p.id), Some(1));

        let mut none: Option<Pair> = None;
        assert_eq!(none.load(Vec::new()).unwrap(), 0);
        assert!(none.is_none());
    }

    #[test]
    fn test_scalar_from_row_reads_first_column() {
        let r = row(&["count"], vec![Value::Int(42)]);
        assert_eq!(i64::from_row(&r).unwrap(), 42);
        assert!(<i64 as FromRow>::schema().is_empty());
    }
}
