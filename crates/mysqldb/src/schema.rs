//! Live schema introspection.
//!
//! Nothing here is cached: every call asks the server, so results always reflect the
//! current schema (and can go stale the moment another session alters it).

use crate::builder::{
    Columns, JoinClause, JoinOptions, SelectBuilder, SqlBuilder, max_id_sql,
};
use crate::client::Connection;
use crate::error::{DbError, DbResult};
use crate::row::{FromRow, Row, RowExt};
use serde::Serialize;

/// One row of `DESC <table>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub field: String,
    pub column_type: String,
    pub nullable: bool,
    /// `PRI`, `UNI`, `MUL` or empty.
    pub key: String,
    pub default: Option<String>,
    /// e.g. `auto_increment`
    pub extra: String,
}

impl ColumnInfo {
    pub fn is_primary_key(&self) -> bool {
        self.key == "PRI"
    }

    pub fn is_auto_increment(&self) -> bool {
        self.extra.to_ascii_lowercase().contains("auto_increment")
    }
}

impl FromRow for ColumnInfo {
    fn from_row(row: &Row) -> DbResult<Self> {
        let null: String = row.try_get_column("Null")?;
        Ok(Self {
            field: row.try_get_column("Field")?,
            column_type: row.try_get_column("Type")?,
            nullable: null.eq_ignore_ascii_case("YES"),
            key: row.try_get_column::<Option<String>>("Key")?.unwrap_or_default(),
            default: row.try_get_column("Default")?,
            extra: row.try_get_column::<Option<String>>("Extra")?.unwrap_or_default(),
        })
    }
}

fn contains_column(columns: &[String], name: &str) -> bool {
    columns.iter().any(|c| c.eq_ignore_ascii_case(name))
}

/// Schema queries over a borrowed connection.
pub struct SchemaIntrospector<'a, C> {
    conn: &'a mut C,
}

impl<'a, C: Connection> SchemaIntrospector<'a, C> {
    pub fn new(conn: &'a mut C) -> Self {
        Self { conn }
    }

    /// Table names in the current database, in server order.
    pub async fn list_tables(&mut self) -> DbResult<Vec<String>> {
        let rows = self.conn.query("SHOW TABLES", &[]).await?;
        rows.iter().map(|row| row.try_get_at::<String>(0)).collect()
    }

    /// Column names of `table`, in server order.
    pub async fn list_columns(&mut self, table: &str) -> DbResult<Vec<String>> {
        Ok(self
            .table_info(table)
            .await?
            .into_iter()
            .map(|c| c.field)
            .collect())
    }

    /// Full `DESC` output for `table`.
    pub async fn table_info(&mut self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        let rows = self.conn.query(&format!("DESC {table}"), &[]).await?;
        rows.iter().map(ColumnInfo::from_row).collect()
    }

    /// The first table, in [`list_tables`](Self::list_tables) order, that has every
    /// column in `columns`.
    pub async fn find_table_containing<S: AsRef<str>>(
        &mut self,
        columns: &[S],
    ) -> DbResult<String> {
        for table in self.list_tables().await? {
            let present = self.list_columns(&table).await?;
            if columns
                .iter()
                .all(|c| contains_column(&present, c.as_ref()))
            {
                return Ok(table);
            }
        }
        let wanted: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        Err(DbError::not_found(format!(
            "no table contains columns [{}]",
            wanted.join(", ")
        )))
    }

    /// Highest `id` in `table`, or `None` when the table is empty.
    pub async fn max_id(&mut self, table: &str) -> DbResult<Option<i64>> {
        let row = self.conn.query_opt(&max_id_sql(table), &[]).await?;
        row.map(|r| r.try_get_at::<i64>(0)).transpose()
    }

    /// Render a SELECT, expanding `*` and inferring the join target when needed.
    ///
    /// Columns missing from `table` are assumed to come from the joined table. Without
    /// an explicit `target`, the first table holding all of them is used, which may not
    /// be the one the caller meant. The lookup runs even when no join is rendered, so a
    /// column no table holds fails with [`DbError::NotFound`].
    pub async fn build_select(
        &mut self,
        table: &str,
        columns: impl Into<Columns>,
        options: &JoinOptions,
    ) -> DbResult<SelectBuilder> {
        let base_columns = self.list_columns(table).await?;
        let columns = match columns.into() {
            Columns::All => base_columns.clone(),
            Columns::List(list) => list,
        };

        let absent: Vec<String> = columns
            .iter()
            .filter(|c| !contains_column(&base_columns, c))
            .cloned()
            .collect();

        let target = match &options.target {
            Some(target) => Some(target.clone()),
            None if !absent.is_empty() => {
                let found = self.find_table_containing(&absent).await?;
                options.join.needs_target().then_some(found)
            }
            None => None,
        };

        let clause = JoinClause::new(options.join, target.as_deref(), options.key.as_deref())?;

        let mut select = SelectBuilder::new(table, columns);
        select
            .join(clause)
            .condition(options.condition.as_deref());
        select.validate()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "mysqldb.schema", table, absent = absent.len(), "resolved select");

        Ok(select)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::JoinKind;
    use crate::testing::FakeConnection;

    fn catalog() -> FakeConnection {
        FakeConnection::new()
            .table("artists", &["Id", "Name"])
            .table("albums", &["Id", "ArtistId", "Title"])
    }

    #[tokio::test]
    async fn test_list_tables_in_server_order() {
        let mut conn = catalog();
        let tables = SchemaIntrospector::new(&mut conn).list_tables().await.unwrap();
        assert_eq!(tables, vec!["artists", "albums"]);
    }

    #[tokio::test]
    async fn test_list_columns_and_info() {
        let mut conn = FakeConnection::music();
        let mut schema = SchemaIntrospector::new(&mut conn);
        assert_eq!(
            schema.list_columns("albums").await.unwrap(),
            vec!["id", "ArtistId", "Title"]
        );

        let info = schema.table_info("albums").await.unwrap();
        assert!(info[0].is_primary_key());
        assert!(info[0].is_auto_increment());
        assert!(!info[0].nullable);
        assert!(info[2].nullable);
        assert_eq!(info[2].column_type, "varchar(255)");
        assert_eq!(info[2].default, None);
    }

    #[tokio::test]
    async fn test_unknown_table_fails_with_execution_error() {
        let mut conn = catalog();
        let err = SchemaIntrospector::new(&mut conn)
            .list_columns("missing")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Execution(_)));
    }

    #[tokio::test]
    async fn test_find_table_containing() {
        let mut conn = catalog();
        let mut schema = SchemaIntrospector::new(&mut conn);
        assert_eq!(
            schema.find_table_containing(&["ArtistId"]).await.unwrap(),
            "albums"
        );
        // First match wins.
        assert_eq!(schema.find_table_containing(&["Id"]).await.unwrap(), "artists");
        // Column names compare case-insensitively.
        assert_eq!(
            schema.find_table_containing(&["artistid", "TITLE"]).await.unwrap(),
            "albums"
        );
    }

    #[tokio::test]
    async fn test_find_table_containing_no_match() {
        let mut conn = catalog();
        let err = SchemaIntrospector::new(&mut conn)
            .find_table_containing(&["Genre"])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: no table contains columns [Genre]");
    }

    #[tokio::test]
    async fn test_star_expands_to_table_columns() {
        let mut conn = catalog();
        let select = SchemaIntrospector::new(&mut conn)
            .build_select("artists", ["*"], &JoinOptions::new())
            .await
            .unwrap();
        assert_eq!(select.to_sql(), "SELECT Id, Name FROM artists");
    }

    #[tokio::test]
    async fn test_join_target_inferred_from_absent_columns() {
        let mut conn = catalog();
        let options = JoinOptions::new()
            .join(JoinKind::Left)
            .key("ArtistId")
            .condition("ArtistId < 5");
        let select = SchemaIntrospector::new(&mut conn)
            .build_select("artists", ["Name", "Title"], &options)
            .await
            .unwrap();
        assert_eq!(
            select.to_sql(),
            "SELECT Name, Title FROM artists LEFT JOIN albums USING(ArtistId) WHERE ArtistId < 5"
        );
    }

    #[tokio::test]
    async fn test_explicit_target_skips_lookup() {
        let mut conn = catalog();
        let options = JoinOptions::new().target("albums").join(JoinKind::Cross);
        let select = SchemaIntrospector::new(&mut conn)
            .build_select("artists", ["Name"], &options)
            .await
            .unwrap();
        assert_eq!(select.to_sql(), "SELECT Name FROM artists CROSS JOIN albums");
        assert!(!conn.statements().contains(&"SHOW TABLES"));
    }

    #[tokio::test]
    async fn test_plain_select_with_unknown_column_is_not_found() {
        let mut conn = catalog();
        let err = SchemaIntrospector::new(&mut conn)
            .build_select("artists", ["Name", "Genre"], &JoinOptions::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
    }

    #[tokio::test]
    async fn test_plain_select_resolves_but_renders_no_join() {
        let mut conn = catalog();
        let select = SchemaIntrospector::new(&mut conn)
            .build_select("artists", ["Name", "Title"], &JoinOptions::new())
            .await
            .unwrap();
        assert_eq!(select.to_sql(), "SELECT Name, Title FROM artists");
        assert!(conn.statements().contains(&"SHOW TABLES"));
    }

    #[tokio::test]
    async fn test_join_without_resolvable_target() {
        let mut conn = catalog();
        let options = JoinOptions::new().join(JoinKind::Cross);
        let err = SchemaIntrospector::new(&mut conn)
            .build_select("artists", ["Name"], &options)
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_join_missing_key() {
        let mut conn = catalog();
        let options = JoinOptions::new().join(JoinKind::Right);
        let err = SchemaIntrospector::new(&mut conn)
            .build_select("artists", ["Name", "Title"], &options)
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_max_id() {
        let mut conn = catalog().max_id("albums", 7);
        let mut schema = SchemaIntrospector::new(&mut conn);
        assert_eq!(schema.max_id("albums").await.unwrap(), Some(7));
        assert_eq!(schema.max_id("artists").await.unwrap(), None);
    }
}
