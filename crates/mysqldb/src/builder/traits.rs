use super::Statement;
use crate::client::Connection;
use crate::error::DbResult;
use crate::row::{FromRow, Row};
use std::future::Future;

/// Base trait for SQL builders.
pub trait SqlBuilder {
    /// Build the SQL string.
    fn build_sql(&self) -> String;

    /// Bound parameters, in placeholder order.
    fn params(&self) -> Vec<crate::value::Value> {
        Vec::new()
    }

    /// Debug helper.
    fn to_sql(&self) -> String {
        self.build_sql()
    }

    /// Validate builder state.
    fn validate(&self) -> DbResult<()> {
        Ok(())
    }

    /// Validate, then render SQL and params together.
    fn build(&self) -> DbResult<Statement> {
        self.validate()?;
        Ok(Statement::new(self.build_sql(), self.params()))
    }

    /// Execute query and return all rows.
    fn query<C: Connection>(
        &self,
        conn: &mut C,
    ) -> impl Future<Output = DbResult<Vec<Row>>> + Send {
        let stmt = self.build();
        async move {
            let stmt = stmt?;
            conn.query(&stmt.sql, &stmt.params).await
        }
    }

    /// Execute query and map all rows to `T`.
    fn query_as<T: FromRow, C: Connection>(
        &self,
        conn: &mut C,
    ) -> impl Future<Output = DbResult<Vec<T>>> + Send {
        let rows = self.query(conn);
        async move {
            let rows = rows.await?;
            rows.iter().map(T::from_row).collect()
        }
    }
}

/// Trait for statements that change data or schema.
pub trait MutationBuilder: SqlBuilder {
    /// Execute and return affected row count.
    fn execute<C: Connection>(&self, conn: &mut C) -> impl Future<Output = DbResult<u64>> + Send {
        let stmt = self.build();
        async move {
            let stmt = stmt?;
            conn.execute(&stmt.sql, &stmt.params).await
        }
    }
}
