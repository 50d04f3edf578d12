//! # mysqldb
//!
//! Shorthand schema and data helpers over a single MySQL connection.
//!
//! ## Features
//!
//! - **One call per task**: create tables, insert, update, select, alter and clean up
//!   with a single method on [`MySqlDb`]
//! - **Join inference**: columns missing from the base table pick the join target
//! - **Bound values**: data always travels as `?` parameters; identifiers are trusted
//! - **Errors, not prints**: every operation returns [`DbResult`]
//! - **Statement monitoring**: timing, logging and stats via [`monitor`]
//!
//! ## Builders
//!
//! The renderers in [`builder`] are pure and can be used without a server:
//!
//! ```
//! use mysqldb::builder::{InsertBuilder, SqlBuilder, UpdateBuilder};
//!
//! let mut insert = InsertBuilder::new("artists", "Name, Formed");
//! insert.value("Low").value(1993);
//! assert_eq!(insert.to_sql(), "INSERT IGNORE INTO artists (Name, Formed) VALUES (?, ?)");
//!
//! let update = UpdateBuilder::new("artists", "Name", 7, "Slowdive");
//! assert_eq!(update.to_sql(), "UPDATE artists SET Name = ? WHERE id = ?");
//! ```
//!
//! ## Connecting
//!
//! ```ignore
//! use mysqldb::{ConnectOptions, MySqlDb};
//!
//! let mut db = MySqlDb::connect(&ConnectOptions::from_env()?).await?;
//! println!("{db}");
//! for table in db.list_tables().await? {
//!     println!("{table}: {:?}", db.list_columns(&table).await?);
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod monitor;
pub mod row;
pub mod schema;
pub mod value;

#[cfg(feature = "mysql")]
pub mod mysql;

pub mod prelude;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{
    AlterTable, ColumnPosition, Columns, DeleteNullBuilder, InsertBuilder, JoinClause, JoinKind,
    JoinOptions, MutationBuilder, SelectBuilder, SqlBuilder, Statement, TableSpec, UpdateBuilder,
};
pub use client::Connection;
pub use config::{AuthPlugin, ConnectOptions, InsertMode};
pub use db::MySqlDb;
pub use error::{DbError, DbResult};
pub use monitor::{
    CompositeMonitor, InstrumentedConnection, LoggingMonitor, MonitorConfig, NoopMonitor,
    QueryContext, QueryMonitor, QueryResult, QueryStats, QueryType, StatsMonitor,
};
pub use row::{FromRow, FromValue, Row, RowExt};
pub use schema::{ColumnInfo, SchemaIntrospector};
pub use value::Value;

#[cfg(feature = "mysql")]
pub use mysql::MySqlConnection;

#[cfg(feature = "tracing")]
pub use monitor::TracingMonitor;
