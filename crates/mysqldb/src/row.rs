//! Result rows and typed cell access

use crate::error::{DbError, DbResult};
use crate::value::Value;
use chrono::NaiveDateTime;

/// One result row: column names paired with decoded values, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in server order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Value of the named column (case-insensitive, as MySQL compares column names).
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, v)| v)
    }

    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.columns.get(index).map(|(_, v)| v)
    }
}

/// Conversion from a decoded [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, String>;
}

fn mismatch(expected: &str, got: &Value) -> String {
    format!("expected {expected}, got {}", got.type_name())
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::UInt(n) => i64::try_from(*n).map_err(|e| e.to_string()),
            Value::Bool(b) => Ok(i64::from(*b)),
            other => Err(mismatch("integer", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|e| e.to_string())
    }
}

impl FromValue for u64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::UInt(n) => Ok(*n),
            Value::Int(n) => u64::try_from(*n).map_err(|e| e.to_string()),
            other => Err(mismatch("unsigned integer", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Real(n) => Ok(*n),
            Value::Int(n) => Ok(*n as f64),
            Value::UInt(n) => Ok(*n as f64),
            other => Err(mismatch("number", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            // TINYINT(1) comes back as an integer
            Value::Int(n) => Ok(*n != 0),
            Value::UInt(n) => Ok(*n != 0),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Bytes(b) => String::from_utf8(b.clone()).map_err(|e| e.to_string()),
            other => Err(mismatch("text", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            Value::Text(s) => Ok(s.clone().into_bytes()),
            other => Err(mismatch("bytes", other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            other => Err(mismatch("datetime", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Trait for converting a result row into a Rust struct.
///
/// ```ignore
/// use mysqldb::{DbResult, FromRow, Row, RowExt};
///
/// struct Artist {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRow for Artist {
///     fn from_row(row: &Row) -> DbResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             name: row.try_get_column("Name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> DbResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning DbError::Decode on failure
    fn try_get_column<T: FromValue>(&self, column: &str) -> DbResult<T>;

    /// Try to get a value by position, returning DbError::Decode on failure
    fn try_get_at<T: FromValue>(&self, index: usize) -> DbResult<T>;
}

impl RowExt for Row {
    fn try_get_column<T: FromValue>(&self, column: &str) -> DbResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| DbError::decode(column, "no such column in row"))?;
        T::from_value(value).map_err(|e| DbError::decode(column, e))
    }

    fn try_get_at<T: FromValue>(&self, index: usize) -> DbResult<T> {
        let (name, value) = self
            .columns
            .get(index)
            .ok_or_else(|| DbError::decode(index.to_string(), "column index out of range"))?;
        T::from_value(value).map_err(|e| DbError::decode(name.as_str(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist() -> Row {
        Row::new(vec![
            ("Id".to_string(), Value::Int(3)),
            ("Name".to_string(), Value::Text("Low".to_string())),
            ("Formed".to_string(), Value::Null),
        ])
    }

    #[test]
    fn get_is_case_insensitive() {
        let row = artist();
        assert_eq!(row.get("id"), Some(&Value::Int(3)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn typed_access() {
        let row = artist();
        let id: i64 = row.try_get_column("Id").unwrap();
        let name: String = row.try_get_at(1).unwrap();
        let formed: Option<i64> = row.try_get_column("Formed").unwrap();
        assert_eq!((id, name.as_str(), formed), (3, "Low", None));
    }

    #[test]
    fn type_mismatch_is_decode_error() {
        let row = artist();
        let err = row.try_get_column::<i64>("Name").unwrap_err();
        assert!(matches!(err, DbError::Decode { ref column, .. } if column == "Name"));
    }
}
