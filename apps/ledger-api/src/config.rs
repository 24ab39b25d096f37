//! Ledger API configuration.
//!
//! Configuration is loaded from environment variables (and `.env`, read by
//! `main`) with fallback to defaults.
//!
//! | Variable                   | Default          |
//! |----------------------------|------------------|
//! | `LEDGER_DATABASE_PATH`     | `./ledger.db`    |
//! | `LEDGER_BIND_ADDR`         | `0.0.0.0:3000`   |
//! | `LEDGER_MAX_CONNECTIONS`   | `5`              |
//! | `LEDGER_BUSY_TIMEOUT_SECS` | `5`              |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ledger_db::DbConfig;

/// Ledger API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// SQLite database file, `:memory:` for a throwaway store
    pub database_path: PathBuf,

    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// Connection pool size
    pub max_connections: u32,

    /// How long a write waits for the database lock
    pub busy_timeout: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            database_path: lookup("LEDGER_DATABASE_PATH")
                .unwrap_or_else(|| "./ledger.db".to_string())
                .into(),

            bind_addr: lookup("LEDGER_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LEDGER_BIND_ADDR".to_string()))?,

            max_connections: lookup("LEDGER_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("LEDGER_MAX_CONNECTIONS".to_string()))?,

            busy_timeout: lookup("LEDGER_BUSY_TIMEOUT_SECS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue("LEDGER_BUSY_TIMEOUT_SECS".to_string()))?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("LEDGER_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Store configuration derived from these settings.
    pub fn db_config(&self) -> DbConfig {
        let base = if self.database_path.as_os_str() == ":memory:" {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.max_connections)
        };

        base.busy_timeout(self.busy_timeout)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.database_path, PathBuf::from("./ledger.db"));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("LEDGER_DATABASE_PATH", "/var/lib/ledger/ledger.db"),
            ("LEDGER_BIND_ADDR", "127.0.0.1:8080"),
            ("LEDGER_MAX_CONNECTIONS", "10"),
            ("LEDGER_BUSY_TIMEOUT_SECS", "1"),
        ])
        .unwrap();

        let db = config.db_config();
        assert_eq!(db.max_connections, 10);
        assert_eq!(db.busy_timeout, Duration::from_secs(1));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_in_memory_path() {
        let config = load(&[("LEDGER_DATABASE_PATH", ":memory:")]).unwrap();
        assert!(config.db_config().is_in_memory());
        assert_eq!(config.db_config().max_connections, 1);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("LEDGER_BIND_ADDR", "nowhere")]),
            Err(ConfigError::InvalidValue(var)) if var == "LEDGER_BIND_ADDR"
        ));
        assert!(load(&[("LEDGER_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("LEDGER_BUSY_TIMEOUT_SECS", "soon")]).is_err());
    }
}
