//! Application configuration.
//!
//! The config loader is the only component that touches the environment;
//! everything downstream consumes this struct. Values come from CLI flags
//! with environment-variable fallbacks.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration for the thought backend.
#[derive(Debug, Clone, Parser)]
#[command(name = "thought-backend", about = "Daily Thought Chain API server")]
pub struct AppConfig {
    /// Path to the SQLite database file. Created on first run.
    #[arg(long, env = "THOUGHTS_DATABASE_PATH", default_value = "thoughts.db")]
    pub database_path: PathBuf,

    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "THOUGHTS_BIND_ADDR", default_value = "0.0.0.0:3001")]
    pub bind_addr: SocketAddr,

    /// Expose the privileged maintenance endpoint
    /// (`DELETE /admin/dev/clear-thoughts`). Local/dev only.
    #[arg(
        long,
        env = "DEV_MAINTENANCE",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new(),
        default_value = "false"
    )]
    pub dev_maintenance: bool,

    /// Maximum number of pooled SQLite connections.
    #[arg(long, env = "THOUGHTS_POOL_SIZE", default_value_t = 16)]
    pub pool_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_the_deployment_contract() {
        let config = AppConfig::parse_from(["thought-backend"]);

        assert_eq!(config.database_path, PathBuf::from("thoughts.db"));
        assert_eq!(config.bind_addr.port(), 3001);
        assert!(!config.dev_maintenance);
        assert_eq!(config.pool_size, 16);
    }

    #[rstest]
    fn flags_override_defaults() {
        let config = AppConfig::parse_from([
            "thought-backend",
            "--database-path",
            "/tmp/t.db",
            "--bind-addr",
            "127.0.0.1:8088",
            "--dev-maintenance",
            "1",
            "--pool-size",
            "4",
        ]);

        assert_eq!(config.database_path, PathBuf::from("/tmp/t.db"));
        assert_eq!(config.bind_addr.port(), 8088);
        assert!(config.dev_maintenance);
        assert_eq!(config.pool_size, 4);
    }
}
