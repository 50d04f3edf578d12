//! sqlx-backed MySQL connection.
//!
//! Statements without parameters go over the text protocol; statements with
//! parameters are prepared and bound positionally.

use crate::client::Connection;
use crate::config::ConnectOptions;
use crate::error::{DbError, DbResult};
use crate::row::Row;
use crate::value::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlRow, MySqlValueRef};
use sqlx::query::Query;
use sqlx::{Column as _, Executor as _, MySql, Row as _, TypeInfo as _, Value as _, ValueRef as _};

/// An exclusively-owned MySQL session.
pub struct MySqlConnection {
    inner: sqlx::MySqlConnection,
    database: String,
}

impl MySqlConnection {
    /// Open a session and apply the autocommit setting from `options`.
    pub async fn connect(options: &ConnectOptions) -> DbResult<Self> {
        options.validate()?;

        let connect_options = MySqlConnectOptions::new()
            .host(&options.host)
            .port(options.port)
            .username(&options.user)
            .password(&options.password)
            .database(&options.database)
            .enable_cleartext_plugin(options.auth_plugin.requires_cleartext());

        let inner = <sqlx::MySqlConnection as sqlx::Connection>::connect_with(&connect_options)
            .await
            .map_err(|e| {
                DbError::connection(format!(
                    "cannot connect to {}:{}/{}: {e}",
                    options.host, options.port, options.database
                ))
            })?;

        let mut conn = Self {
            inner,
            database: options.database.clone(),
        };
        let flag = u8::from(options.autocommit);
        conn.inner
            .execute(format!("SET autocommit = {flag}").as_str())
            .await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "mysqldb.connect",
            host = %options.host,
            port = options.port,
            database = %options.database,
            auth_plugin = %options.auth_plugin,
            autocommit = options.autocommit,
            "connected"
        );

        Ok(conn)
    }

    /// Name of the database selected at connect time.
    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Connection for MySqlConnection {
    async fn query(&mut self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        let rows = if params.is_empty() {
            self.inner.fetch_all(sql).await?
        } else {
            bind_values(sqlx::query(sql), params)
                .fetch_all(&mut self.inner)
                .await?
        };
        rows.iter().map(from_row).collect()
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> DbResult<u64> {
        let result = if params.is_empty() {
            self.inner.execute(sql).await?
        } else {
            bind_values(sqlx::query(sql), params)
                .execute(&mut self.inner)
                .await?
        };
        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> DbResult<()> {
        self.inner.execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> DbResult<()> {
        self.inner.execute("ROLLBACK").await?;
        Ok(())
    }

    async fn ping(&mut self) -> DbResult<()> {
        sqlx::Connection::ping(&mut self.inner)
            .await
            .map_err(|e| DbError::connection(e.to_string()))
    }

    async fn close(self) -> DbResult<()> {
        sqlx::Connection::close(self.inner)
            .await
            .map_err(|e| DbError::connection(e.to_string()))
    }
}

fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Value],
) -> Query<'q, MySql, MySqlArguments> {
    for value in params {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(v) => query.bind(*v),
            Value::Int(v) => query.bind(*v),
            Value::UInt(v) => query.bind(*v),
            Value::Real(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Bytes(v) => query.bind(v.as_slice()),
            Value::DateTime(v) => query.bind(*v),
        };
    }
    query
}

fn column_value(value: MySqlValueRef<'_>) -> Result<Value, sqlx::Error> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    let type_name = value.type_info().name().to_string();
    let owned = sqlx::ValueRef::to_owned(&value);

    Ok(match type_name.as_str() {
        "BOOLEAN" => Value::Bool(owned.try_decode()?),
        name if name.ends_with(" UNSIGNED") => Value::UInt(owned.try_decode_unchecked()?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            Value::Int(owned.try_decode_unchecked()?)
        }
        "FLOAT" => Value::Real(f64::from(owned.try_decode::<f32>()?)),
        "DOUBLE" => Value::Real(owned.try_decode()?),
        "DATETIME" | "TIMESTAMP" => Value::DateTime(owned.try_decode()?),
        "DATE" => Value::Text(owned.try_decode::<chrono::NaiveDate>()?.to_string()),
        "TIME" => Value::Text(owned.try_decode::<chrono::NaiveTime>()?.to_string()),
        "BIT" | "GEOMETRY" => Value::Bytes(owned.try_decode_unchecked()?),
        // Metadata statements report some text columns as binary.
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            let bytes: Vec<u8> = owned.try_decode_unchecked()?;
            match String::from_utf8(bytes) {
                Ok(text) => Value::Text(text),
                Err(e) => Value::Bytes(e.into_bytes()),
            }
        }
        _ => Value::Text(owned.try_decode_unchecked()?),
    })
}

fn from_row(row: &MySqlRow) -> DbResult<Row> {
    let mut columns = Vec::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index)?;
        let value = column_value(raw).map_err(|e| DbError::decode(column.name(), e.to_string()))?;
        columns.push((column.name().to_string(), value));
    }
    Ok(Row::new(columns))
}
