use super::truncate_sql_bytes;
use super::types::{QueryContext, QueryMonitor, QueryResult};
use std::time::Duration;
use tracing::Level;

/// A `tracing`-based monitor that emits every finished statement on the
/// `mysqldb.sql` target.
///
/// Failed statements are always emitted at `WARN`; slow ones at `WARN` with `slow = true`.
///
/// Enable via the crate feature: `mysqldb = { features = ["tracing"] }`.
#[derive(Debug, Clone)]
pub struct TracingMonitor {
    /// Tracing event level for successful statements.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingMonitor {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingMonitor {
    /// Create a new monitor with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }
}

impl QueryMonitor for TracingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let sql = self.truncate_sql(&ctx.sql);
        let sql = sql.as_ref();
        let elapsed_ms = duration.as_secs_f64() * 1000.0;

        if let QueryResult::Error(error) = result {
            tracing::warn!(
                target: "mysqldb.sql",
                query_type = ?ctx.query_type,
                params = ctx.param_count,
                elapsed_ms,
                error = %error,
                sql = %sql,
                "statement failed"
            );
            return;
        }

        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        emit_at_level!(
            self.level,
            target: "mysqldb.sql",
            query_type = ?ctx.query_type,
            params = ctx.param_count,
            elapsed_ms,
            result = %result,
            sql = %sql,
            "sql"
        );
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        tracing::warn!(
            target: "mysqldb.sql",
            query_type = ?ctx.query_type,
            elapsed_ms = duration.as_secs_f64() * 1000.0,
            slow = true,
            sql = %self.truncate_sql(&ctx.sql),
            "slow statement"
        );
    }
}
