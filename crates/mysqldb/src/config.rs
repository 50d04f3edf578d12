//! Connection and behaviour configuration.

use crate::error::{DbError, DbResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Default MySQL TCP port.
pub const DEFAULT_PORT: u16 = 3306;

/// Authentication plugin requested for the account.
///
/// The server picks the plugin per account and the driver negotiates it. The value
/// only changes driver behaviour for [`AuthPlugin::MysqlClearPassword`], which must be
/// opted in; the other two variants are advisory and configure the same connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPlugin {
    /// `mysql_native_password`, the legacy plugin.
    #[default]
    MysqlNativePassword,
    /// `caching_sha2_password`, the MySQL 8 default.
    CachingSha2Password,
    /// `mysql_clear_password`; only sensible over TLS.
    MysqlClearPassword,
}

impl AuthPlugin {
    /// Whether the driver must allow sending the password in clear text.
    pub fn requires_cleartext(&self) -> bool {
        matches!(self, AuthPlugin::MysqlClearPassword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPlugin::MysqlNativePassword => "mysql_native_password",
            AuthPlugin::CachingSha2Password => "caching_sha2_password",
            AuthPlugin::MysqlClearPassword => "mysql_clear_password",
        }
    }
}

impl fmt::Display for AuthPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthPlugin {
    type Err = DbError;

    fn from_str(s: &str) -> DbResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql_native_password" => Ok(AuthPlugin::MysqlNativePassword),
            "caching_sha2_password" => Ok(AuthPlugin::CachingSha2Password),
            "mysql_clear_password" => Ok(AuthPlugin::MysqlClearPassword),
            other => Err(DbError::invalid_argument(format!(
                "unknown auth plugin '{other}'"
            ))),
        }
    }
}

/// How `INSERT` statements treat unique-key collisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// `INSERT IGNORE`: a duplicate row is skipped and reports 0 affected rows.
    #[default]
    Ignore,
    /// Plain `INSERT`: a duplicate row fails with [`DbError::DuplicateKey`].
    Strict,
}

/// Options for opening a connection.
///
/// `user`, `password`, `host` and `database` are required; [`ConnectOptions::validate`]
/// rejects empty values.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectOptions {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub auth_plugin: AuthPlugin,
    /// When `false` (the default) writes stay pending until `save()`.
    #[serde(default)]
    pub autocommit: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("port", &self.port)
            .field("auth_plugin", &self.auth_plugin)
            .field("autocommit", &self.autocommit)
            .finish()
    }
}

impl ConnectOptions {
    /// Create options with the four required values and defaults for the rest.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            host: host.into(),
            database: database.into(),
            port: DEFAULT_PORT,
            auth_plugin: AuthPlugin::default(),
            autocommit: false,
        }
    }

    /// Set the TCP port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the authentication plugin.
    pub fn auth_plugin(mut self, plugin: AuthPlugin) -> Self {
        self.auth_plugin = plugin;
        self
    }

    /// Commit every statement immediately instead of waiting for `save()`.
    pub fn autocommit(mut self, enabled: bool) -> Self {
        self.autocommit = enabled;
        self
    }

    /// Load options from `MYSQL_USER`, `MYSQL_PASSWORD`, `MYSQL_HOST`, `MYSQL_DATABASE`
    /// and the optional `MYSQL_PORT`, `MYSQL_AUTH_PLUGIN`.
    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| DbError::invalid_argument(format!("{key} is not set")))
        };

        let mut opts = Self::new(
            required("MYSQL_USER")?,
            required("MYSQL_PASSWORD")?,
            required("MYSQL_HOST")?,
            required("MYSQL_DATABASE")?,
        );
        if let Some(port) = lookup("MYSQL_PORT") {
            opts.port = port
                .parse()
                .map_err(|_| DbError::invalid_argument(format!("invalid MYSQL_PORT '{port}'")))?;
        }
        if let Some(plugin) = lookup("MYSQL_AUTH_PLUGIN") {
            opts.auth_plugin = plugin.parse()?;
        }
        opts.validate()?;
        Ok(opts)
    }

    /// Reject empty required values.
    pub fn validate(&self) -> DbResult<()> {
        for (name, value) in [
            ("user", &self.user),
            ("host", &self.host),
            ("database", &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(DbError::invalid_argument(format!(
                    "connect option '{name}' is required"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn from_lookup_applies_defaults() {
        let opts = ConnectOptions::from_lookup(env(&[
            ("MYSQL_USER", "app"),
            ("MYSQL_PASSWORD", "secret"),
            ("MYSQL_HOST", "localhost"),
            ("MYSQL_DATABASE", "music"),
        ]))
        .unwrap();
        assert_eq!(opts.port, DEFAULT_PORT);
        assert_eq!(opts.auth_plugin, AuthPlugin::MysqlNativePassword);
        assert!(!opts.autocommit);
    }

    #[test]
    fn from_lookup_reads_optional_values() {
        let opts = ConnectOptions::from_lookup(env(&[
            ("MYSQL_USER", "app"),
            ("MYSQL_PASSWORD", ""),
            ("MYSQL_HOST", "db"),
            ("MYSQL_DATABASE", "music"),
            ("MYSQL_PORT", "3307"),
            ("MYSQL_AUTH_PLUGIN", "caching_sha2_password"),
        ]))
        .unwrap();
        assert_eq!(opts.port, 3307);
        assert_eq!(opts.auth_plugin, AuthPlugin::CachingSha2Password);
    }

    #[test]
    fn missing_required_value_is_invalid_argument() {
        let err = ConnectOptions::from_lookup(env(&[("MYSQL_USER", "app")])).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn empty_database_is_rejected() {
        let opts = ConnectOptions::new("app", "pw", "localhost", " ");
        assert!(opts.validate().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn unknown_plugin_is_rejected() {
        assert!("sha256_password".parse::<AuthPlugin>().is_err());
    }

    #[test]
    fn only_clear_password_requires_cleartext() {
        assert!(AuthPlugin::MysqlClearPassword.requires_cleartext());
        assert!(!AuthPlugin::MysqlNativePassword.requires_cleartext());
        assert!(!AuthPlugin::CachingSha2Password.requires_cleartext());
    }

    #[test]
    fn debug_redacts_password() {
        let opts = ConnectOptions::new("app", "hunter2", "localhost", "music");
        assert!(!format!("{opts:?}").contains("hunter2"));
    }
}
