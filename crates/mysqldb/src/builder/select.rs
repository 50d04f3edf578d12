use super::traits::SqlBuilder;
use super::{SURROGATE_KEY, require_ident};
use crate::error::{DbError, DbResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Kind of join clause rendered after `FROM <table>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum JoinKind {
    #[default]
    None,
    Left,
    Inner,
    Right,
    Cross,
}

impl JoinKind {
    /// All kinds, in declaration order.
    pub const ALL: [JoinKind; 5] = [
        JoinKind::None,
        JoinKind::Left,
        JoinKind::Inner,
        JoinKind::Right,
        JoinKind::Cross,
    ];

    /// SQL keyword preceding `JOIN`, or `None` when no join is rendered.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            JoinKind::None => None,
            JoinKind::Left => Some("LEFT"),
            JoinKind::Inner => Some("INNER"),
            JoinKind::Right => Some("RIGHT"),
            JoinKind::Cross => Some("CROSS"),
        }
    }

    /// Whether a join target table is needed.
    pub fn needs_target(&self) -> bool {
        !matches!(self, JoinKind::None)
    }

    /// Whether a `USING(key)` clause is rendered.
    pub fn needs_key(&self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::Inner | JoinKind::Right)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("NONE"))
    }
}

impl FromStr for JoinKind {
    type Err = DbError;

    /// `"null"`, `"none"` and `""` mean no join; other names are case-insensitive.
    fn from_str(s: &str) -> DbResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "null" | "none" => Ok(JoinKind::None),
            "left" => Ok(JoinKind::Left),
            "inner" => Ok(JoinKind::Inner),
            "right" => Ok(JoinKind::Right),
            "cross" => Ok(JoinKind::Cross),
            other => Err(DbError::invalid_argument(format!(
                "unknown join kind '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for JoinKind {
    type Error = DbError;

    fn try_from(s: String) -> DbResult<Self> {
        s.parse()
    }
}

/// Options recognised by `select`.
///
/// Every field has an explicit default: no target, no join, no key, no condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JoinOptions {
    /// Table to join. When absent, the first table holding the requested columns
    /// that `table` lacks is used.
    pub target: Option<String>,
    pub join: JoinKind,
    /// Shared column for `USING(key)`.
    pub key: Option<String>,
    /// Raw row filter rendered after `WHERE`.
    #[serde(rename = "where")]
    pub condition: Option<String>,
}

impl JoinOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, table: impl Into<String>) -> Self {
        self.target = Some(table.into());
        self
    }

    pub fn join(mut self, kind: JoinKind) -> Self {
        self.join = kind;
        self
    }

    /// Set the join kind from its name; unknown names are rejected.
    pub fn join_named(mut self, kind: &str) -> DbResult<Self> {
        self.join = kind.parse()?;
        Ok(self)
    }

    pub fn key(mut self, column: impl Into<String>) -> Self {
        self.key = Some(column.into());
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

/// Columns requested by `select`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    /// Every column of the base table (`*` or `all`).
    All,
    List(Vec<String>),
}

impl Columns {
    /// Interpret caller-supplied names. A first entry of `*` or `all` selects everything.
    pub fn parse<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        match names.first().map(String::as_str) {
            Some("*") | Some("all") => Columns::All,
            _ => Columns::List(names),
        }
    }
}

impl From<&[&str]> for Columns {
    fn from(names: &[&str]) -> Self {
        Columns::parse(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(names: [&str; N]) -> Self {
        Columns::parse(names)
    }
}

impl From<Vec<String>> for Columns {
    fn from(names: Vec<String>) -> Self {
        Columns::parse(names)
    }
}

/// A resolved join clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinClause {
    None,
    /// `<KIND> JOIN target USING(key)`
    Using {
        kind: JoinKind,
        target: String,
        key: String,
    },
    /// `CROSS JOIN target`
    Cross { target: String },
}

impl JoinClause {
    /// Assemble a clause, rejecting a missing target or key.
    pub fn new(kind: JoinKind, target: Option<&str>, key: Option<&str>) -> DbResult<Self> {
        if !kind.needs_target() {
            return Ok(JoinClause::None);
        }
        let target = target
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                DbError::invalid_argument(format!("{kind} JOIN requires a target table"))
            })?
            .to_string();
        if !kind.needs_key() {
            return Ok(JoinClause::Cross { target });
        }
        let key = key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DbError::invalid_argument(format!("{kind} JOIN requires a key")))?
            .to_string();
        Ok(JoinClause::Using { kind, target, key })
    }

    fn write_sql(&self, out: &mut String) {
        match self {
            JoinClause::None => {}
            JoinClause::Using { kind, target, key } => {
                out.push(' ');
                out.push_str(kind.keyword().unwrap_or_default());
                out.push_str(" JOIN ");
                out.push_str(target);
                out.push_str(" USING(");
                out.push_str(key);
                out.push(')');
            }
            JoinClause::Cross { target } => {
                out.push_str(" CROSS JOIN ");
                out.push_str(target);
            }
        }
    }
}

/// `SELECT <cols> FROM <table> [<join>] [WHERE <condition>]` with concrete columns.
///
/// Star expansion and join-target lookup happen in
/// [`crate::schema::SchemaIntrospector::build_select`]; this type only renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectBuilder {
    table: String,
    columns: Vec<String>,
    join: JoinClause,
    condition: Option<String>,
}

impl SelectBuilder {
    pub fn new<I, S>(table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            join: JoinClause::None,
            condition: None,
        }
    }

    pub fn join(&mut self, clause: JoinClause) -> &mut Self {
        self.join = clause;
        self
    }

    /// Set the raw `WHERE` condition. Empty strings are ignored.
    pub fn condition(&mut self, condition: Option<&str>) -> &mut Self {
        self.condition = condition
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl SqlBuilder for SelectBuilder {
    fn build_sql(&self) -> String {
        let mut sql = String::with_capacity(64);
        sql.push_str("SELECT ");
        sql.push_str(&self.columns.join(", "));
        sql.push_str(" FROM ");
        sql.push_str(&self.table);
        self.join.write_sql(&mut sql);
        if let Some(condition) = &self.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        sql
    }

    fn validate(&self) -> DbResult<()> {
        require_ident("table", &self.table)?;
        if self.columns.is_empty() {
            return Err(DbError::invalid_argument("SELECT requires at least one column"));
        }
        Ok(())
    }
}

/// Render a SELECT over concrete columns without touching the server.
pub fn render_select(
    table: &str,
    columns: &[String],
    join: &JoinClause,
    condition: Option<&str>,
) -> DbResult<String> {
    let mut select = SelectBuilder::new(table, columns.iter().cloned());
    select.join(join.clone()).condition(condition);
    select.validate()?;
    Ok(select.build_sql())
}

/// Highest surrogate key currently in `table`.
pub fn max_id_sql(table: &str) -> String {
    format!("SELECT {SURROGATE_KEY} FROM {table} ORDER BY {SURROGATE_KEY} DESC LIMIT 1")
}
