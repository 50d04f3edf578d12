use super::require_ident;
use super::traits::{MutationBuilder, SqlBuilder};
use crate::error::{DbError, DbResult};
use serde::Deserialize;

/// Name of the surrogate key injected into every created table.
pub const SURROGATE_KEY: &str = "id";

const SURROGATE_KEY_DEF: &str = "id INT NOT NULL AUTO_INCREMENT";

/// Table definition used by `create_table`.
///
/// `fields` are raw column definitions such as `"urls VARCHAR(255) NOT NULL UNIQUE"`.
/// The `id` surrogate key is added automatically and must not be listed.
///
/// ```rust
/// use mysqldb::builder::{SqlBuilder, TableSpec};
///
/// let spec = TableSpec::new("T", ["x INT"]);
/// assert_eq!(
///     spec.build_sql(),
///     "CREATE TABLE IF NOT EXISTS T( id INT NOT NULL AUTO_INCREMENT, x INT, PRIMARY KEY ( id ))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl TableSpec {
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl SqlBuilder for TableSpec {
    fn build_sql(&self) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {}( {SURROGATE_KEY_DEF}, ",
            self.name
        );
        for field in &self.fields {
            sql.push_str(field);
            sql.push_str(", ");
        }
        sql.push_str("PRIMARY KEY ( id ))");
        sql
    }

    fn validate(&self) -> DbResult<()> {
        require_ident("table", &self.name)?;
        if self.fields.iter().any(|f| f.trim().is_empty()) {
            return Err(DbError::invalid_argument(format!(
                "table '{}' has an empty field definition",
                self.name
            )));
        }
        Ok(())
    }
}

impl MutationBuilder for TableSpec {}

/// Where `ADD COLUMN` places the new column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnPosition {
    #[default]
    First,
    After(String),
    /// Append after the last column (no position clause).
    Last,
}

impl ColumnPosition {
    /// Parse a raw position clause: `FIRST`, `AFTER <col>`, or empty for `Last`.
    pub fn parse(clause: &str) -> DbResult<Self> {
        let clause = clause.trim();
        if clause.is_empty() {
            return Ok(ColumnPosition::Last);
        }
        if clause.eq_ignore_ascii_case("first") {
            return Ok(ColumnPosition::First);
        }
        let mut words = clause.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(kw), Some(column), None) if kw.eq_ignore_ascii_case("after") => {
                Ok(ColumnPosition::After(column.to_string()))
            }
            _ => Err(DbError::invalid_argument(format!(
                "unrecognised column position '{clause}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AlterOp {
    AddColumn {
        column: String,
        definition: String,
        position: ColumnPosition,
    },
    DropColumn(String),
    RenameColumn { from: String, to: String },
    RenameTable(String),
}

/// `ALTER TABLE` statement with one or more comma-separated operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTable {
    table: String,
    ops: Vec<AlterOp>,
}

impl AlterTable {
    fn single(table: &str, op: AlterOp) -> Self {
        Self {
            table: table.to_string(),
            ops: vec![op],
        }
    }

    /// `ALTER TABLE t ADD COLUMN c <definition> [FIRST | AFTER x]`
    pub fn add_column(
        table: &str,
        column: &str,
        definition: &str,
        position: ColumnPosition,
    ) -> Self {
        Self::single(
            table,
            AlterOp::AddColumn {
                column: column.to_string(),
                definition: definition.to_string(),
                position,
            },
        )
    }

    /// `ALTER TABLE t DROP COLUMN c`
    pub fn drop_column(table: &str, column: &str) -> Self {
        Self::single(table, AlterOp::DropColumn(column.to_string()))
    }

    /// `ALTER TABLE t RENAME COLUMN a TO b`
    pub fn rename_column(table: &str, from: &str, to: &str) -> Self {
        Self::single(
            table,
            AlterOp::RenameColumn {
                from: from.to_string(),
                to: to.to_string(),
            },
        )
    }

    /// `ALTER TABLE t RENAME TO n`
    pub fn rename_table(table: &str, new_name: &str) -> Self {
        Self::single(table, AlterOp::RenameTable(new_name.to_string()))
    }

    /// Append the operations of `next` so both run in one statement.
    ///
    /// Fails when `next` alters a different table.
    pub fn then(mut self, next: AlterTable) -> DbResult<Self> {
        if next.table != self.table {
            return Err(DbError::invalid_argument(format!(
                "cannot combine ALTER TABLE {} with ALTER TABLE {}",
                self.table, next.table
            )));
        }
        self.ops.extend(next.ops);
        Ok(self)
    }

    /// Number of operations in the statement.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl AlterOp {
    fn render(&self) -> String {
        match self {
            AlterOp::AddColumn {
                column,
                definition,
                position,
            } => {
                let mut sql = format!("ADD COLUMN {column} {definition}");
                match position {
                    ColumnPosition::First => sql.push_str(" FIRST"),
                    ColumnPosition::After(col) => {
                        sql.push_str(" AFTER ");
                        sql.push_str(col);
                    }
                    ColumnPosition::Last => {}
                }
                sql
            }
            AlterOp::DropColumn(column) => format!("DROP COLUMN {column}"),
            AlterOp::RenameColumn { from, to } => format!("RENAME COLUMN {from} TO {to}"),
            AlterOp::RenameTable(new_name) => format!("RENAME TO {new_name}"),
        }
    }

    fn validate(&self) -> DbResult<()> {
        match self {
            AlterOp::AddColumn {
                column, definition, ..
            } => {
                require_ident("column", column)?;
                if definition.trim().is_empty() {
                    return Err(DbError::invalid_argument(format!(
                        "column '{column}' needs a definition"
                    )));
                }
                Ok(())
            }
            AlterOp::DropColumn(column) => require_ident("column", column),
            AlterOp::RenameColumn { from, to } => {
                require_ident("column", from)?;
                require_ident("new column", to)
            }
            AlterOp::RenameTable(new_name) => require_ident("new table", new_name),
        }
    }
}

impl SqlBuilder for AlterTable {
    fn build_sql(&self) -> String {
        let ops: Vec<String> = self.ops.iter().map(AlterOp::render).collect();
        format!("ALTER TABLE {} {}", self.table, ops.join(", "))
    }

    fn validate(&self) -> DbResult<()> {
        require_ident("table", &self.table)?;
        self.ops.iter().try_for_each(AlterOp::validate)
    }
}

impl MutationBuilder for AlterTable {}

/// Statement that restarts surrogate-key numbering from 1.
///
/// **Destructive:** the existing `id` column is dropped (when `has_id`) and re-added as
/// the first column, so every row gets a fresh id in physical order and the previous
/// ids are lost. Anything referencing old ids will point at different rows afterwards.
/// Drop and add are a single `ALTER TABLE`, so a failure leaves the table unchanged.
pub fn reset_auto_increment(table: &str, has_id: bool) -> AlterTable {
    let add = AlterTable::add_column(
        table,
        SURROGATE_KEY,
        "INT NOT NULL AUTO_INCREMENT PRIMARY KEY",
        ColumnPosition::First,
    );
    if !has_id {
        return add;
    }
    let mut stmt = AlterTable::drop_column(table, SURROGATE_KEY);
    stmt.ops.extend(add.ops);
    stmt
}
