//! Server settings loaded via OrthoConfig.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Startup configuration merged from CLI flags, `HABITS_*` environment
/// variables, and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HABITS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound for pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Return the database URL unless it is blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("habits-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("HABITS_BIND_ADDR", None::<String>),
            ("HABITS_DATABASE_URL", None::<String>),
            ("HABITS_DB_MAX_CONNECTIONS", None::<String>),
            ("HABITS_RUN_MIGRATIONS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.db_max_connections, 10);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HABITS_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            (
                "HABITS_DATABASE_URL",
                Some("postgres://localhost/habits".to_owned()),
            ),
            ("HABITS_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("HABITS_RUN_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("override parses"),
            SocketAddr::from(([127, 0, 0, 1], 9090))
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/habits"));
        assert_eq!(settings.db_max_connections, 4);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn blank_database_urls_count_as_absent() {
        let _guard = lock_env([("HABITS_DATABASE_URL", Some("   ".to_owned()))]);

        assert!(load_from_empty_args().database_url().is_none());
    }
}
