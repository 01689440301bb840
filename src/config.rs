//! Database settings for the staging store.
//!
//! Settings come from environment-style keys (`DB_HOST`, `DB_PORT`, ...), usually through a
//! `.env` file. Values pasted from documentation often arrive as `["secret"]`; [`clean_setting`]
//! strips that wrapping before anything else looks at them.

use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::{ImportError, ImportResult};

/// Port used when `DB_PORT` is not set at all.
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Default timeout for establishing the connection.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Validated connection settings.
///
/// Every field is non-empty. `Debug` redacts the password.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Driver kind from `DB_CONNECTION`; informational only.
    pub connection: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub connect_timeout: Duration,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("connection", &self.connection)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl DbConfig {
    /// Load settings from the process environment, reading `.env` first if there is one.
    pub fn from_env() -> ImportResult<Self> {
        // A missing .env is fine; the variables may come from the real environment.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source.
    ///
    /// Fails with [`ImportError::Configuration`] naming every setting that is blank after
    /// cleaning, plus a `DB_PORT` that is not a port number. Values never appear in the error.
    pub fn from_lookup<F>(lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| clean_setting(lookup(key).as_deref().unwrap_or(""));

        let host = get("DB_HOST");
        let port = match lookup("DB_PORT") {
            Some(raw) => clean_setting(&raw),
            None => DEFAULT_DB_PORT.to_string(),
        };
        let database = get("DB_DATABASE");
        let username = get("DB_USERNAME");
        let password = get("DB_PASSWORD");

        let missing: Vec<String> = [
            ("DB_HOST", &host),
            ("DB_PORT", &port),
            ("DB_DATABASE", &database),
            ("DB_USERNAME", &username),
            ("DB_PASSWORD", &password),
        ]
        .iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k.to_string())
        .collect();

        let parsed_port = port.parse::<u16>().ok().filter(|p| *p != 0);
        let invalid: Vec<String> = if !port.is_empty() && parsed_port.is_none() {
            vec!["DB_PORT".to_string()]
        } else {
            Vec::new()
        };

        if !missing.is_empty() || !invalid.is_empty() {
            return Err(ImportError::Configuration { missing, invalid });
        }

        let connection = Some(get("DB_CONNECTION")).filter(|c| !c.is_empty());
        if let Some(kind) = connection.as_deref() {
            if !kind.eq_ignore_ascii_case("mysql") {
                warn!(connection = kind, "DB_CONNECTION is not mysql; connecting as MySQL anyway");
            }
        }

        Ok(Self {
            connection,
            host,
            port: parsed_port.unwrap_or(DEFAULT_DB_PORT),
            database,
            username,
            password,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        })
    }
}

/// Strip whitespace and accidental `[...]` / quote wrapping from a setting value.
///
/// `  ["usuario"] ` becomes `usuario`. Only one layer of each wrapper is removed, and a value that
/// is a lone quote character cleans to empty.
pub fn clean_setting(raw: &str) -> String {
    let mut s = raw.trim();
    if let Some(inner) = strip_pair(s, '[', ']') {
        s = inner.trim();
    }
    for quote in ['"', '\''] {
        if let Some(inner) = strip_pair(s, quote, quote) {
            s = inner;
            break;
        }
    }
    s.to_string()
}

/// Inner text of `s` when it starts with `open` and ends with `close`; a single-character `s`
/// matching both has empty inner text.
fn strip_pair(s: &str, open: char, close: char) -> Option<&str> {
    if !(s.starts_with(open) && s.ends_with(close)) {
        return None;
    }
    Some(s.get(open.len_utf8()..s.len() - close.len_utf8()).unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DB_CONNECTION", "mysql"),
            ("DB_HOST", "[db.internal]"),
            ("DB_PORT", "3307"),
            ("DB_DATABASE", "corrigeai"),
            ("DB_USERNAME", "\"udb\""),
            ("DB_PASSWORD", "[\"s3cr3t\"]"),
        ]
    }

    #[test]
    fn clean_setting_strips_brackets_and_quotes() {
        assert_eq!(clean_setting("  [\"usuario\"] "), "usuario");
        assert_eq!(clean_setting("'abc'"), "abc");
        assert_eq!(clean_setting("[ host ]"), "host");
        assert_eq!(clean_setting("plain"), "plain");
        assert_eq!(clean_setting("\""), "");
        assert_eq!(clean_setting("["), "[");
        assert_eq!(clean_setting("   "), "");
    }

    #[test]
    fn from_lookup_cleans_every_value() {
        let cfg = DbConfig::from_lookup(lookup_from(&full_env())).unwrap();
        assert_eq!(cfg.host, "db.internal");
        assert_eq!(cfg.port, 3307);
        assert_eq!(cfg.database, "corrigeai");
        assert_eq!(cfg.username, "udb");
        assert_eq!(cfg.password, "s3cr3t");
        assert_eq!(cfg.connection.as_deref(), Some("mysql"));
    }

    #[test]
    fn port_defaults_when_unset() {
        let env: Vec<_> = full_env().into_iter().filter(|(k, _)| *k != "DB_PORT").collect();
        let cfg = DbConfig::from_lookup(lookup_from(&env)).unwrap();
        assert_eq!(cfg.port, DEFAULT_DB_PORT);
    }

    #[test]
    fn missing_settings_are_all_named() {
        let env = [("DB_HOST", "[]"), ("DB_PORT", ""), ("DB_DATABASE", "corrigeai")];
        let err = DbConfig::from_lookup(lookup_from(&env)).unwrap_err();
        assert_eq!(
            err,
            ImportError::Configuration {
                missing: vec![
                    "DB_HOST".to_string(),
                    "DB_PORT".to_string(),
                    "DB_USERNAME".to_string(),
                    "DB_PASSWORD".to_string(),
                ],
                invalid: Vec::new(),
            }
        );
    }

    #[test]
    fn lone_quote_password_is_missing() {
        let mut env = full_env();
        env.retain(|(k, _)| *k != "DB_PASSWORD");
        env.push(("DB_PASSWORD", " \" "));
        let err = DbConfig::from_lookup(lookup_from(&env)).unwrap_err();
        assert_eq!(
            err,
            ImportError::Configuration {
                missing: vec!["DB_PASSWORD".to_string()],
                invalid: Vec::new(),
            }
        );
    }

    #[test]
    fn non_numeric_port_is_invalid() {
        let mut env = full_env();
        env.retain(|(k, _)| *k != "DB_PORT");
        env.push(("DB_PORT", "mysql-port"));
        let err = DbConfig::from_lookup(lookup_from(&env)).unwrap_err();
        assert_eq!(
            err,
            ImportError::Configuration {
                missing: Vec::new(),
                invalid: vec!["DB_PORT".to_string()],
            }
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let cfg = DbConfig::from_lookup(lookup_from(&full_env())).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("s3cr3t"));
        assert!(dbg.contains("<redacted>"));
    }
}
