use super::config::MonitorConfig;
use super::monitors::NoopMonitor;
use super::types::{QueryContext, QueryMonitor, QueryResult};
use crate::client::Connection;
use crate::error::DbResult;
use crate::row::Row;
use crate::value::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A connection wrapper that times every statement and reports it to a monitor.
///
/// Monitoring must be explicitly enabled via `MonitorConfig::enable_monitoring()`.
pub struct InstrumentedConnection<C> {
    conn: C,
    monitor: Arc<dyn QueryMonitor>,
    config: MonitorConfig,
}

impl<C: Connection> InstrumentedConnection<C> {
    /// Wrap `conn` with no monitoring.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            monitor: Arc::new(NoopMonitor),
            config: MonitorConfig::default(),
        }
    }

    /// Set the monitor configuration.
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the statement monitor.
    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    /// Set the statement monitor from an Arc.
    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Enable monitoring.
    pub fn enable_monitoring(mut self) -> Self {
        self.config.monitoring_enabled = true;
        self
    }

    /// Check if monitoring is enabled.
    pub fn is_monitoring_enabled(&self) -> bool {
        self.config.monitoring_enabled
    }

    /// Get the current configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Get a reference to the inner connection.
    pub fn inner(&self) -> &C {
        &self.conn
    }

    /// Get a mutable reference to the inner connection.
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Get the inner connection, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.conn
    }

    fn report_start(&self, ctx: &QueryContext) {
        if self.config.monitoring_enabled {
            self.monitor.on_query_start(ctx);
        }
    }

    fn report_result(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if !self.config.monitoring_enabled {
            return;
        }

        self.monitor.on_query_complete(ctx, duration, result);

        if let Some(threshold) = self.config.slow_query_threshold {
            if duration >= threshold {
                self.monitor.on_slow_query(ctx, duration);
            }
        }
    }

    fn observe<T>(
        &self,
        ctx: &QueryContext,
        start: Instant,
        result: &DbResult<T>,
        describe: impl FnOnce(&T) -> QueryResult,
    ) {
        let outcome = match result {
            Ok(value) => describe(value),
            Err(e) => QueryResult::error(e.to_string()),
        };
        self.report_result(ctx, start.elapsed(), &outcome);
    }
}

impl<C: Connection> Connection for InstrumentedConnection<C> {
    async fn query(&mut self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        let ctx = QueryContext::new(sql, params.len());
        self.report_start(&ctx);
        let start = Instant::now();
        let result = self.conn.query(sql, params).await;
        self.observe(&ctx, start, &result, |rows| QueryResult::Rows(rows.len()));
        result
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> DbResult<u64> {
        let ctx = QueryContext::new(sql, params.len());
        self.report_start(&ctx);
        let start = Instant::now();
        let result = self.conn.execute(sql, params).await;
        self.observe(&ctx, start, &result, |n| QueryResult::Affected(*n));
        result
    }

    async fn commit(&mut self) -> DbResult<()> {
        let ctx = QueryContext::new("COMMIT", 0);
        self.report_start(&ctx);
        let start = Instant::now();
        let result = self.conn.commit().await;
        self.observe(&ctx, start, &result, |_| QueryResult::Done);
        result
    }

    async fn rollback(&mut self) -> DbResult<()> {
        let ctx = QueryContext::new("ROLLBACK", 0);
        self.report_start(&ctx);
        let start = Instant::now();
        let result = self.conn.rollback().await;
        self.observe(&ctx, start, &result, |_| QueryResult::Done);
        result
    }

    async fn ping(&mut self) -> DbResult<()> {
        self.conn.ping().await
    }

    async fn close(self) -> DbResult<()> {
        self.conn.close().await
    }
}
