//! In-memory connection used by unit tests.

use crate::client::Connection;
use crate::error::{DbError, DbResult};
use crate::row::Row;
use crate::value::Value;
use std::collections::HashMap;

/// Answers `SHOW TABLES`, `DESC`, max-id and version queries from a fixed schema
/// and records every statement it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeConnection {
    tables: Vec<(String, Vec<String>)>,
    max_ids: HashMap<String, i64>,
    affected: u64,
    fail_with: Option<DbError>,
    pub(crate) log: Vec<(String, Vec<Value>)>,
    pub(crate) commits: usize,
    pub(crate) rollbacks: usize,
}

impl FakeConnection {
    pub(crate) fn new() -> Self {
        Self {
            affected: 1,
            ..Self::default()
        }
    }

    /// `artists(id, Name)` and `albums(id, ArtistId, Title)`.
    pub(crate) fn music() -> Self {
        Self::new()
            .table("artists", &["id", "Name"])
            .table("albums", &["id", "ArtistId", "Title"])
    }

    pub(crate) fn table(mut self, name: &str, columns: &[&str]) -> Self {
        self.tables.push((
            name.to_string(),
            columns.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }

    pub(crate) fn max_id(mut self, table: &str, id: i64) -> Self {
        self.max_ids.insert(table.to_string(), id);
        self
    }

    pub(crate) fn affected(mut self, n: u64) -> Self {
        self.affected = n;
        self
    }

    /// Fail every `execute` with `err`.
    pub(crate) fn failing(mut self, err: DbError) -> Self {
        self.fail_with = Some(err);
        self
    }

    pub(crate) fn statements(&self) -> Vec<&str> {
        self.log.iter().map(|(sql, _)| sql.as_str()).collect()
    }

    fn describe(&self, table: &str) -> DbResult<Vec<Row>> {
        let (_, columns) = self
            .tables
            .iter()
            .find(|(name, _)| name == table)
            .ok_or_else(|| DbError::execution(format!("Table 'test.{table}' doesn't exist")))?;

        Ok(columns
            .iter()
            .map(|field| {
                let is_id = field == "id";
                Row::new(vec![
                    ("Field".into(), Value::from(field.as_str())),
                    (
                        "Type".into(),
                        Value::from(if is_id { "int" } else { "varchar(255)" }),
                    ),
                    ("Null".into(), Value::from(if is_id { "NO" } else { "YES" })),
                    ("Key".into(), Value::from(if is_id { "PRI" } else { "" })),
                    ("Default".into(), Value::Null),
                    (
                        "Extra".into(),
                        Value::from(if is_id { "auto_increment" } else { "" }),
                    ),
                ])
            })
            .collect())
    }
}

impl Connection for FakeConnection {
    async fn query(&mut self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        self.log.push((sql.to_string(), params.to_vec()));

        if sql == "SHOW TABLES" {
            return Ok(self
                .tables
                .iter()
                .map(|(name, _)| {
                    Row::new(vec![("Tables_in_test".into(), Value::from(name.as_str()))])
                })
                .collect());
        }
        if let Some(table) = sql.strip_prefix("DESC ") {
            return self.describe(table);
        }
        if sql == "SELECT VERSION(), DATABASE()" {
            return Ok(vec![Row::new(vec![
                ("VERSION()".into(), Value::from("8.0.36")),
                ("DATABASE()".into(), Value::from("test")),
            ])]);
        }
        if let Some(rest) = sql.strip_prefix("SELECT id FROM ") {
            let table = rest.split_whitespace().next().unwrap_or_default();
            return Ok(self
                .max_ids
                .get(table)
                .map(|id| Row::new(vec![("id".into(), Value::Int(*id))]))
                .into_iter()
                .collect());
        }
        Ok(Vec::new())
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> DbResult<u64> {
        self.log.push((sql.to_string(), params.to_vec()));
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(self.affected),
        }
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.rollbacks += 1;
        Ok(())
    }

    async fn close(self) -> DbResult<()> {
        Ok(())
    }
}
