use super::require_ident;
use super::traits::{MutationBuilder, SqlBuilder};
use crate::error::DbResult;

/// `DELETE FROM t WHERE field IS NULL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNullBuilder {
    table: String,
    field: String,
}

impl DeleteNullBuilder {
    pub fn new(table: &str, field: &str) -> Self {
        Self {
            table: table.to_string(),
            field: field.to_string(),
        }
    }
}

impl SqlBuilder for DeleteNullBuilder {
    fn build_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} IS NULL", self.table, self.field)
    }

    // An empty field would render `WHERE  IS NULL`.
    fn validate(&self) -> DbResult<()> {
        require_ident("table", &self.table)?;
        require_ident("field", &self.field)
    }
}

impl MutationBuilder for DeleteNullBuilder {}
