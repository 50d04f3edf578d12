use super::traits::{MutationBuilder, SqlBuilder};
use super::{SURROGATE_KEY, require_ident};
use crate::error::DbResult;
use crate::value::Value;

/// Single-field, single-row UPDATE keyed by the surrogate `id`.
///
/// Renders `UPDATE t SET field = ? WHERE id = ?` with params `[value, row_id]`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBuilder {
    table: String,
    field: String,
    row_id: Value,
    value: Value,
}

impl UpdateBuilder {
    pub fn new(
        table: &str,
        field: &str,
        row_id: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            table: table.to_string(),
            field: field.to_string(),
            row_id: row_id.into(),
            value: value.into(),
        }
    }
}

impl SqlBuilder for UpdateBuilder {
    fn build_sql(&self) -> String {
        format!(
            "UPDATE {} SET {} = ? WHERE {SURROGATE_KEY} = ?",
            self.table, self.field
        )
    }

    fn params(&self) -> Vec<Value> {
        vec![self.value.clone(), self.row_id.clone()]
    }

    fn validate(&self) -> DbResult<()> {
        require_ident("table", &self.table)?;
        require_ident("field", &self.field)
    }
}

impl MutationBuilder for UpdateBuilder {}
