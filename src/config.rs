use actix_web::cookie::Key;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_APP_NAME: &str = "SignAssist";
/// Room for two high-density signatures plus the text fields.
const DEFAULT_PAYLOAD_LIMIT: usize = 8 * 1024 * 1024;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const MIN_SESSION_KEY_LEN: usize = 64;

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Postgres URL. Complaints are kept in memory when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub session_key: Option<String>,
    pub app_name: String,
    /// Max request body for form and JSON submissions, in bytes.
    pub payload_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            session_key: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            payload_limit: DEFAULT_PAYLOAD_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset
    /// and unparsable numbers fall back to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", defaults.db_max_connections),
            session_key: get("SESSION_KEY"),
            app_name: get("APP_NAME").unwrap_or(defaults.app_name),
            payload_limit: parse_or(get("PAYLOAD_LIMIT"), "PAYLOAD_LIMIT", defaults.payload_limit),
        }
    }

    /// Session encryption key. Falls back to a random key (sessions lost on
    /// restart) when SESSION_KEY is missing or shorter than 64 bytes.
    pub fn session_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= MIN_SESSION_KEY_LEN => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!(
                    "SESSION_KEY too short ({} bytes, need {MIN_SESSION_KEY_LEN}+), generating random key",
                    val.len()
                );
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(value: Option<String>, name: &str, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {name} value '{raw}'");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = from_map(&[]);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.app_name, "SignAssist");
        assert!(config.database_url.is_none());
        assert_eq!(config.payload_limit, 8 * 1024 * 1024);
    }

    #[test]
    fn reads_overrides() {
        let config = from_map(&[
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("DATABASE_URL", "postgres://localhost/signassist"),
            ("PAYLOAD_LIMIT", "1024"),
        ]);
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/signassist"));
        assert_eq!(config.payload_limit, 1024);
    }

    #[test]
    fn blank_and_invalid_values_fall_back() {
        let config = from_map(&[("DATABASE_URL", "  "), ("PAYLOAD_LIMIT", "lots")]);
        assert!(config.database_url.is_none());
        assert_eq!(config.payload_limit, 8 * 1024 * 1024);
    }
}
