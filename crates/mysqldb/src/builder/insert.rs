use super::traits::{MutationBuilder, SqlBuilder};
use super::{placeholders, require_ident};
use crate::config::InsertMode;
use crate::error::{DbError, DbResult};
use crate::value::Value;

/// INSERT builder.
///
/// Columns are given as one comma-separated string, values are bound one
/// placeholder each.
///
/// ```rust
/// use mysqldb::builder::{InsertBuilder, SqlBuilder};
///
/// let mut ib = InsertBuilder::new("WebPages", "urls, title");
/// ib.value("https://example.com").value("Example");
/// assert_eq!(
///     ib.build_sql(),
///     "INSERT IGNORE INTO WebPages (urls, title) VALUES (?, ?)"
/// );
/// assert_eq!(ib.params().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InsertBuilder {
    /// Table name
    table: String,
    /// Comma-separated column names
    fields: String,
    /// Params
    values: Vec<Value>,
    mode: InsertMode,
}

impl InsertBuilder {
    pub fn new(table: &str, fields: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: fields.to_string(),
            values: Vec::new(),
            mode: InsertMode::default(),
        }
    }

    /// Append one value.
    pub fn value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Append values in column order.
    pub fn values<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Choose between `INSERT IGNORE` and plain `INSERT`.
    pub fn mode(&mut self, mode: InsertMode) -> &mut Self {
        self.mode = mode;
        self
    }

    fn field_count(&self) -> usize {
        self.fields.split(',').filter(|f| !f.trim().is_empty()).count()
    }
}

impl SqlBuilder for InsertBuilder {
    fn build_sql(&self) -> String {
        let verb = match self.mode {
            InsertMode::Ignore => "INSERT IGNORE INTO",
            InsertMode::Strict => "INSERT INTO",
        };
        format!(
            "{verb} {} ({}) VALUES ({})",
            self.table,
            self.fields,
            placeholders(self.values.len())
        )
    }

    fn params(&self) -> Vec<Value> {
        self.values.clone()
    }

    fn validate(&self) -> DbResult<()> {
        require_ident("table", &self.table)?;
        if self.values.is_empty() {
            return Err(DbError::invalid_argument("INSERT requires at least one value"));
        }
        let fields = self.field_count();
        if fields != self.values.len() {
            return Err(DbError::invalid_argument(format!(
                "INSERT into {} lists {fields} field(s) but {} value(s)",
                self.table,
                self.values.len()
            )));
        }
        Ok(())
    }
}

impl MutationBuilder for InsertBuilder {}
