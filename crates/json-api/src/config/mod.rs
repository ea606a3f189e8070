//! Server configuration module

use clap::Parser;

use cinemates_app::context::AppConfig;

use crate::config::{
    db::DatabaseConfig,
    gateway::GatewayConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod gateway;
pub(crate) mod observability;
pub(crate) mod server;

/// Cinemates JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "cinemates-json", about = "Cinemates JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment gateway settings.
    #[command(flatten)]
    pub gateway: GatewayConfig,
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

    /// Settings the application services are built from.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            gateway: self.gateway.to_razorpay_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 7] = [
        "cinemates-json",
        "--database-url",
        "postgres://localhost/cinemates",
        "--razorpay-key-id",
        "rzp_test_key",
        "--razorpay-key-secret",
        "shh",
    ];

    #[test]
    fn defaults_apply_when_only_required_values_are_given() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.server.cors_allowed_origin, "http://localhost:5173");
        assert_eq!(config.gateway.razorpay_api_base, "https://api.razorpay.com");
        assert_eq!(
            config.app_config().gateway.timeout,
            Duration::from_secs(10)
        );
        assert_eq!(
            config.app_config().database_url,
            "postgres://localhost/cinemates"
        );

        Ok(())
    }
}
