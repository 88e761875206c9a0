//! Server configuration module

use clap::Parser;

use crate::config::{
    admin::AdminConfig, db::DatabaseConfig, observability::LoggingConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod admin;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Trolley JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "trolley-json", about = "Trolley JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Admin endpoint settings.
    #[command(flatten)]
    pub admin: AdminConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_database_and_token_are_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "trolley-json",
            "--database-url",
            "postgres://localhost/trolley",
            "--admin-token",
            "secret",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698", "default bind address");
        assert_eq!(config.logging.slow_request_threshold_ms, 1_000, "slow threshold");
        assert_eq!(config.admin.admin_token, "secret", "admin token");
        assert!(!config.database.run_migrations, "migrations are opt-in");
        assert_eq!(config.server.shutdown_grace().as_secs(), 30, "shutdown grace");

        Ok(())
    }

    #[test]
    fn admin_token_defaults_to_disabled() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "trolley-json",
            "--database-url",
            "postgres://localhost/trolley",
        ])?;

        assert!(config.admin.admin_token.is_empty(), "admin routes disabled");

        Ok(())
    }
}
