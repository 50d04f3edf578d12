//! Convenient imports for typical `mysqldb` usage.
//!
//! ```ignore
//! use mysqldb::prelude::*;
//! ```

pub use crate::{
    ColumnPosition, Columns, ConnectOptions, Connection, DbError, DbResult, FromRow, InsertMode, JoinKind,
    JoinOptions, MutationBuilder, MySqlDb, Row, RowExt, SqlBuilder, TableSpec, Value,
};

#[cfg(feature = "mysql")]
pub use crate::MySqlConnection;
