//! One-call wrappers over a single connection.
//!
//! [`MySqlDb`] owns a [`Connection`] and turns each shorthand operation into one or
//! two statements. Nothing is printed; every outcome comes back as a [`DbResult`].
//!
//! ```rust,ignore
//! use mysqldb::{ConnectOptions, JoinKind, JoinOptions, MySqlDb, TableSpec};
//!
//! let mut db = MySqlDb::connect(&ConnectOptions::from_env()?).await?;
//! db.create_table(&TableSpec::new("artists", ["Name VARCHAR(255) UNIQUE"])).await?;
//! db.write("artists", "Name", ["Low"]).await?;
//! db.save().await?;
//!
//! let rows = db
//!     .select(
//!         "artists",
//!         ["Name", "Title"],
//!         &JoinOptions::new()
//!             .join(JoinKind::Cross)
//!             .condition("artists.id = albums.ArtistId"),
//!     )
//!     .await?;
//! ```

use crate::builder::{
    AlterTable, ColumnPosition, Columns, DeleteNullBuilder, InsertBuilder, JoinOptions,
    MutationBuilder, SURROGATE_KEY, SqlBuilder, TableSpec, UpdateBuilder, reset_auto_increment,
};
use crate::client::Connection;
use crate::config::InsertMode;
use crate::error::{DbError, DbResult};
use crate::row::{Row, RowExt};
use crate::schema::{ColumnInfo, SchemaIntrospector};
use crate::value::Value;
use std::fmt;

#[cfg(feature = "mysql")]
use crate::config::ConnectOptions;
#[cfg(feature = "mysql")]
use crate::mysql::MySqlConnection;

/// Shorthand schema and data operations over one exclusively-owned connection.
pub struct MySqlDb<C> {
    conn: C,
    version: String,
    database: String,
    insert_mode: InsertMode,
}

#[cfg(feature = "mysql")]
impl MySqlDb<MySqlConnection> {
    /// Open a MySQL session with `options`.
    pub async fn connect(options: &ConnectOptions) -> DbResult<Self> {
        let conn = MySqlConnection::connect(options).await?;
        Self::new(conn).await
    }
}

impl<C: Connection> MySqlDb<C> {
    /// Wrap an open connection, reading the server version and current database.
    pub async fn new(mut conn: C) -> DbResult<Self> {
        let row = conn
            .query_opt("SELECT VERSION(), DATABASE()", &[])
            .await?
            .ok_or_else(|| DbError::connection("server returned no version row"))?;
        let version: String = row.try_get_at(0)?;
        let database: Option<String> = row.try_get_at(1)?;

        Ok(Self {
            conn,
            version,
            database: database.unwrap_or_default(),
            insert_mode: InsertMode::default(),
        })
    }

    /// Choose how [`write`](Self::write) treats duplicate keys.
    pub fn with_insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub fn insert_mode(&self) -> InsertMode {
        self.insert_mode
    }

    /// Server version reported at connect time.
    pub fn server_version(&self) -> &str {
        &self.version
    }

    /// Database selected at connect time.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Direct access to the underlying connection.
    pub fn connection(&mut self) -> &mut C {
        &mut self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }

    fn schema(&mut self) -> SchemaIntrospector<'_, C> {
        SchemaIntrospector::new(&mut self.conn)
    }

    /// `CREATE TABLE IF NOT EXISTS` with an auto-increment `id` primary key.
    pub async fn create_table(&mut self, spec: &TableSpec) -> DbResult<()> {
        spec.execute(&mut self.conn).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "mysqldb.db", table = %spec.name, "created table");
        Ok(())
    }

    /// Insert one row. `fields` is a comma-separated column list matching `values`.
    ///
    /// Returns the affected row count. In [`InsertMode::Ignore`] a duplicate row is
    /// skipped and reports 0.
    pub async fn write<I, V>(&mut self, table: &str, fields: &str, values: I) -> DbResult<u64>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut insert = InsertBuilder::new(table, fields);
        insert.values(values).mode(self.insert_mode);
        let affected = insert.execute(&mut self.conn).await?;

        #[cfg(feature = "tracing")]
        if affected == 0 {
            tracing::debug!(target: "mysqldb.db", table, "insert skipped a duplicate row");
        }

        Ok(affected)
    }

    /// Set `field` on the row whose `id` is `row_id`.
    pub async fn update_row(
        &mut self,
        table: &str,
        field: &str,
        row_id: impl Into<Value>,
        value: impl Into<Value>,
    ) -> DbResult<u64> {
        UpdateBuilder::new(table, field, row_id, value)
            .execute(&mut self.conn)
            .await
    }

    /// Render the SELECT that [`select`](Self::select) would run.
    pub async fn select_sql(
        &mut self,
        table: &str,
        columns: impl Into<Columns>,
        options: &JoinOptions,
    ) -> DbResult<String> {
        let select = self.schema().build_select(table, columns, options).await?;
        Ok(select.build_sql())
    }

    /// Run a SELECT, expanding `*` and inferring the join target when needed.
    pub async fn select(
        &mut self,
        table: &str,
        columns: impl Into<Columns>,
        options: &JoinOptions,
    ) -> DbResult<Vec<Row>> {
        let select = self.schema().build_select(table, columns, options).await?;
        select.query(&mut self.conn).await
    }

    /// Add a column at `position`.
    pub async fn add_column(
        &mut self,
        table: &str,
        column: &str,
        definition: &str,
        position: ColumnPosition,
    ) -> DbResult<()> {
        AlterTable::add_column(table, column, definition, position)
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    pub async fn drop_column(&mut self, table: &str, column: &str) -> DbResult<()> {
        AlterTable::drop_column(table, column)
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    pub async fn rename_column(&mut self, table: &str, column: &str, new_name: &str) -> DbResult<()> {
        AlterTable::rename_column(table, column, new_name)
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    pub async fn rename_table(&mut self, table: &str, new_name: &str) -> DbResult<()> {
        AlterTable::rename_table(table, new_name)
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    /// Renumber `id` from 1 by dropping and re-adding it as the first column.
    ///
    /// Destructive: existing id values are discarded and anything referencing them
    /// is left dangling. Drop and add run as one statement, so a failed reset leaves
    /// the old `id` column in place.
    pub async fn reset_id(&mut self, table: &str) -> DbResult<()> {
        let columns = self.list_columns(table).await?;
        let has_id = columns.iter().any(|c| c.eq_ignore_ascii_case(SURROGATE_KEY));
        reset_auto_increment(table, has_id)
            .execute(&mut self.conn)
            .await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "mysqldb.db", table, has_id, "auto increment reset");
        Ok(())
    }

    /// Delete rows where `field` is NULL. Returns the number of rows removed.
    pub async fn delete_null(&mut self, table: &str, field: &str) -> DbResult<u64> {
        DeleteNullBuilder::new(table, field)
            .execute(&mut self.conn)
            .await
    }

    pub async fn list_tables(&mut self) -> DbResult<Vec<String>> {
        self.schema().list_tables().await
    }

    pub async fn list_columns(&mut self, table: &str) -> DbResult<Vec<String>> {
        self.schema().list_columns(table).await
    }

    pub async fn find_table_containing<S: AsRef<str>>(&mut self, columns: &[S]) -> DbResult<String> {
        self.schema().find_table_containing(columns).await
    }

    pub async fn table_info(&mut self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        self.schema().table_info(table).await
    }

    pub async fn max_id(&mut self, table: &str) -> DbResult<Option<i64>> {
        self.schema().max_id(table).await
    }

    /// Commit pending writes.
    pub async fn save(&mut self) -> DbResult<()> {
        self.conn.commit().await
    }

    /// Discard pending writes.
    pub async fn rollback(&mut self) -> DbResult<()> {
        self.conn.rollback().await
    }

    /// Whether the server still answers.
    pub async fn is_connected(&mut self) -> bool {
        self.conn.ping().await.is_ok()
    }

    /// Close the connection. Uncommitted writes are discarded by the server.
    pub async fn close(self) -> DbResult<()> {
        self.conn.close().await
    }
}

impl<C> fmt::Display for MySqlDb<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MySqlDb[ Version {} - Database: {} ]",
            self.version, self.database
        )
    }
}

impl<C> fmt::Debug for MySqlDb<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlDb")
            .field("version", &self.version)
            .field("database", &self.database)
            .field("insert_mode", &self.insert_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::JoinKind;
    use crate::testing::FakeConnection;

    async fn music_db() -> MySqlDb<FakeConnection> {
        MySqlDb::new(FakeConnection::music()).await.unwrap()
    }

    #[tokio::test]
    async fn test_display_status() {
        let db = music_db().await;
        assert_eq!(db.to_string(), "MySqlDb[ Version 8.0.36 - Database: test ]");
        assert_eq!(db.server_version(), "8.0.36");
        assert_eq!(db.database(), "test");
    }

    #[tokio::test]
    async fn test_write_uses_insert_ignore_by_default() {
        let mut db = music_db().await;
        let affected = db.write("artists", "Name", ["Low"]).await.unwrap();
        assert_eq!(affected, 1);

        let (sql, params) = db.connection().log.last().unwrap().clone();
        assert_eq!(sql, "INSERT IGNORE INTO artists (Name) VALUES (?)");
        assert_eq!(params, vec![Value::from("Low")]);
    }

    #[tokio::test]
    async fn test_write_reports_skipped_duplicate() {
        let mut db = MySqlDb::new(FakeConnection::music().affected(0))
            .await
            .unwrap();
        assert_eq!(db.write("artists", "Name", ["Low"]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_duplicate_key() {
        let conn = FakeConnection::music().failing(DbError::DuplicateKey(
            "Duplicate entry 'Low' for key 'Name'".into(),
        ));
        let mut db = MySqlDb::new(conn)
            .await
            .unwrap()
            .with_insert_mode(InsertMode::Strict);

        let err = db.write("artists", "Name", ["Low"]).await.unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(
            db.connection().log.last().unwrap().0,
            "INSERT INTO artists (Name) VALUES (?)"
        );
    }

    #[tokio::test]
    async fn test_write_rejects_empty_values_without_sending() {
        let mut db = music_db().await;
        let sent = db.connection().log.len();
        let err = db
            .write("artists", "Name", Vec::<Value>::new())
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(db.connection().log.len(), sent);
    }

    #[tokio::test]
    async fn test_update_row_binds_value_and_id() {
        let mut db = music_db().await;
        db.update_row("artists", "Name", 3, "Slowdive").await.unwrap();
        let (sql, params) = db.connection().log.last().unwrap().clone();
        assert_eq!(sql, "UPDATE artists SET Name = ? WHERE id = ?");
        assert_eq!(params, vec![Value::from("Slowdive"), Value::Int(3)]);
    }

    #[tokio::test]
    async fn test_select_infers_join_target() {
        let mut db = music_db().await;
        let options = JoinOptions::new().join(JoinKind::Inner).key("ArtistId");
        let sql = db
            .select_sql("artists", ["Name", "Title"], &options)
            .await
            .unwrap();
        assert_eq!(
            sql,
            "SELECT Name, Title FROM artists INNER JOIN albums USING(ArtistId)"
        );
    }

    #[tokio::test]
    async fn test_select_cross_join_filtered_on_foreign_key() {
        let mut db = music_db().await;
        let options = JoinOptions::new()
            .join(JoinKind::Cross)
            .condition("artists.id = albums.ArtistId");
        let sql = db
            .select_sql("artists", ["Name", "Title"], &options)
            .await
            .unwrap();
        assert_eq!(
            sql,
            "SELECT Name, Title FROM artists CROSS JOIN albums WHERE artists.id = albums.ArtistId"
        );
    }

    #[tokio::test]
    async fn test_select_runs_rendered_sql() {
        let mut db = music_db().await;
        let options = JoinOptions::new().condition("id = 1");
        db.select("artists", ["*"], &options).await.unwrap();
        assert_eq!(
            db.connection().log.last().unwrap().0,
            "SELECT id, Name FROM artists WHERE id = 1"
        );
    }

    #[tokio::test]
    async fn test_alter_operations() {
        let mut db = music_db().await;
        db.add_column("artists", "Formed", "INT", ColumnPosition::After("Name".into()))
            .await
            .unwrap();
        db.rename_column("artists", "Formed", "Founded").await.unwrap();
        db.drop_column("artists", "Founded").await.unwrap();
        db.rename_table("artists", "bands").await.unwrap();

        let statements = db.connection().statements();
        assert_eq!(
            statements[statements.len() - 4..],
            [
                "ALTER TABLE artists ADD COLUMN Formed INT AFTER Name",
                "ALTER TABLE artists RENAME COLUMN Formed TO Founded",
                "ALTER TABLE artists DROP COLUMN Founded",
                "ALTER TABLE artists RENAME TO bands",
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_id_drops_and_adds_in_one_statement() {
        let mut db = music_db().await;
        db.reset_id("artists").await.unwrap();
        let statements = db.connection().statements();
        assert_eq!(
            statements[statements.len() - 2..],
            [
                "DESC artists",
                "ALTER TABLE artists DROP COLUMN id, \
                 ADD COLUMN id INT NOT NULL AUTO_INCREMENT PRIMARY KEY FIRST",
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_id_without_id_only_adds() {
        let conn = FakeConnection::new().table("tags", &["Label"]);
        let mut db = MySqlDb::new(conn).await.unwrap();
        db.reset_id("tags").await.unwrap();
        let statements = db.connection().statements();
        assert_eq!(
            statements.last().copied(),
            Some("ALTER TABLE tags ADD COLUMN id INT NOT NULL AUTO_INCREMENT PRIMARY KEY FIRST")
        );
        assert!(!statements.iter().any(|sql| sql.contains("DROP COLUMN")));
    }

    #[tokio::test]
    async fn test_delete_null_and_max_id() {
        let mut db = MySqlDb::new(FakeConnection::music().max_id("albums", 42).affected(3))
            .await
            .unwrap();
        assert_eq!(db.delete_null("albums", "Title").await.unwrap(), 3);
        assert_eq!(db.max_id("albums").await.unwrap(), Some(42));
        assert_eq!(db.max_id("artists").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_rollback_and_close() {
        let mut db = music_db().await;
        db.create_table(&TableSpec::new("T", ["x INT"])).await.unwrap();
        db.save().await.unwrap();
        db.rollback().await.unwrap();
        assert!(db.is_connected().await);
        assert_eq!(db.connection().commits, 1);
        assert_eq!(db.connection().rollbacks, 1);
        db.close().await.unwrap();
    }
}
