//! Statement monitoring for SQL execution.
//!
//! Wrap any [`Connection`](crate::client::Connection) in an [`InstrumentedConnection`]
//! to time each statement and report it to a [`QueryMonitor`]:
//!
//! ```rust,ignore
//! use mysqldb::monitor::{InstrumentedConnection, LoggingMonitor, MonitorConfig};
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_slow_query_threshold(Duration::from_secs(1))
//!     .enable_monitoring();
//!
//! let conn = InstrumentedConnection::new(conn)
//!     .with_config(config)
//!     .with_monitor(LoggingMonitor::new());
//! ```

mod config;
mod instrumented;
mod monitors;
mod types;

#[cfg(feature = "tracing")]
mod tracing_monitor;


pub use config::MonitorConfig;
pub use instrumented::InstrumentedConnection;
pub use monitors::{CompositeMonitor, LoggingMonitor, NoopMonitor, QueryStats, StatsMonitor};
pub use types::{QueryContext, QueryMonitor, QueryResult, QueryType};

#[cfg(feature = "tracing")]
pub use tracing_monitor::TracingMonitor;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
