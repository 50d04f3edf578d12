use std::fmt;
use std::time::Duration;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// CREATE / ALTER / DROP / RENAME
    Ddl,
    /// SHOW / DESC / DESCRIBE
    Introspect,
    /// COMMIT / ROLLBACK / SET autocommit
    Transaction,
    /// Anything else
    Other,
}

fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    sql.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
        && sql[keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '_')
}

impl QueryType {
    /// Detect query type from the leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        const TABLE: &[(&str, QueryType)] = &[
            ("SELECT", QueryType::Select),
            ("INSERT", QueryType::Insert),
            ("REPLACE", QueryType::Insert),
            ("UPDATE", QueryType::Update),
            ("DELETE", QueryType::Delete),
            ("CREATE", QueryType::Ddl),
            ("ALTER", QueryType::Ddl),
            ("DROP", QueryType::Ddl),
            ("RENAME", QueryType::Ddl),
            ("TRUNCATE", QueryType::Ddl),
            ("SHOW", QueryType::Introspect),
            ("DESCRIBE", QueryType::Introspect),
            ("DESC", QueryType::Introspect),
            ("COMMIT", QueryType::Transaction),
            ("ROLLBACK", QueryType::Transaction),
            ("START", QueryType::Transaction),
            ("BEGIN", QueryType::Transaction),
            ("SET", QueryType::Transaction),
        ];
        TABLE
            .iter()
            .find(|(kw, _)| starts_with_keyword(trimmed, kw))
            .map_or(QueryType::Other, |(_, ty)| *ty)
    }
}

/// Context information about the statement being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// The SQL text sent to the server.
    pub sql: String,
    /// Number of bound parameters.
    pub param_count: usize,
    /// Detected query type.
    pub query_type: QueryType,
}

impl QueryContext {
    /// Create a new query context.
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
        }
    }
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Result of a statement for monitoring purposes.
#[derive(Debug, Clone)]
pub enum QueryResult {
    /// Query returned rows.
    Rows(usize),
    /// Statement affected rows.
    Affected(u64),
    /// Commit / rollback / ping finished.
    Done,
    /// Statement failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating the message to avoid monitoring data explosion.
    pub fn error(msg: String) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            Self::Error(format!("{}...", super::truncate_sql_bytes(&msg, MAX_ERROR_LEN)))
        } else {
            Self::Error(msg)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryResult::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Done => f.write_str("ok"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Trait for observing statement execution.
///
/// Implement this trait to collect metrics, log statements, or integrate
/// with observability systems. Monitors only observe; they cannot change or
/// abort a statement.
pub trait QueryMonitor: Send + Sync {
    /// Called before a statement is executed.
    ///
    /// Default implementation does nothing.
    fn on_query_start(&self, _ctx: &QueryContext) {}

    /// Called after a statement completes (success or failure).
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult);

    /// Called when a statement exceeds the configured slow threshold.
    ///
    /// Default implementation does nothing.
    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}
