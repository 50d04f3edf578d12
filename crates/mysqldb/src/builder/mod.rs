//! SQL renderers for the shorthand operations.
//!
//! ## Design
//!
//! - Identifiers (tables, columns, join targets) are caller-trusted and interpolated
//!   verbatim. They are never quoted or escaped.
//! - Data values (insert/update payloads, row ids) are always bound as `?` params.
//! - Rendering is pure; anything that needs the live schema lives in [`crate::schema`].

pub mod delete;
pub mod insert;
pub mod select;
pub mod table;
pub mod traits;
pub mod update;

pub use delete::DeleteNullBuilder;
pub use insert::InsertBuilder;
pub use select::{
    Columns, JoinClause, JoinKind, JoinOptions, SelectBuilder, max_id_sql, render_select,
};
pub use table::{AlterTable, ColumnPosition, SURROGATE_KEY, TableSpec, reset_auto_increment};
pub use traits::{MutationBuilder, SqlBuilder};
pub use update::UpdateBuilder;

use crate::value::Value;

/// Rendered SQL text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A statement without bound parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// `?, ?, ?` for `n` values.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

pub(crate) fn require_ident(kind: &str, name: &str) -> crate::error::DbResult<()> {
    if name.trim().is_empty() {
        return Err(crate::error::DbError::invalid_argument(format!(
            "{kind} name is required"
        )));
    }
    Ok(())
}
