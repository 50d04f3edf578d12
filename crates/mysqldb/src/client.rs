//! The execution-service seam.
//!
//! Everything above this trait renders SQL; everything below it talks to a server.
//! [`crate::mysql::MySqlConnection`] is the production implementation, tests use
//! in-memory fakes, and [`crate::monitor::InstrumentedConnection`] wraps either.

use crate::error::DbResult;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;

/// A single exclusively-owned database connection.
///
/// Every call issues one statement and waits for the reply. Identifiers in `sql`
/// are taken verbatim; `params` bind to `?` placeholders in order.
pub trait Connection: Send {
    /// Execute a query and return all rows.
    fn query(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Vec<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<u64>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 or more rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Commit pending writes.
    fn commit(&mut self) -> impl Future<Output = DbResult<()>> + Send;

    /// Discard pending writes.
    fn rollback(&mut self) -> impl Future<Output = DbResult<()>> + Send;

    /// Check that the server is still reachable.
    fn ping(&mut self) -> impl Future<Output = DbResult<()>> + Send {
        async move {
            self.query("SELECT 1", &[]).await?;
            Ok(())
        }
    }

    /// Close the connection. Pending writes that were not committed are discarded
    /// by the server.
    fn close(self) -> impl Future<Output = DbResult<()>> + Send
    where
        Self: Sized;
}
