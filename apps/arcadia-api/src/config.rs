//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;

use arcadia_core::{CostRatio, IN_STORE_COST_RATIO, ONLINE_COST_RATIO};
use arcadia_db::{DbConfig, EngineConfig};
use serde::{Deserialize, Serialize};

const MAX_BPS: u32 = 10_000;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Cost share of online sales, in basis points (default: 6500)
    pub online_cost_bps: u32,

    /// Cost share of in-store sales, in basis points (default: 7000)
    pub in_store_cost_bps: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ApiConfig {
            port: parse_or(&lookup, "ARCADIA_PORT", 8080)?,

            database_path: lookup("ARCADIA_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("arcadia.db")),

            max_connections: parse_or(&lookup, "ARCADIA_MAX_CONNECTIONS", 5)?,

            online_cost_bps: parse_or(&lookup, "ARCADIA_ONLINE_COST_BPS", ONLINE_COST_RATIO.bps())?,

            in_store_cost_bps: parse_or(
                &lookup,
                "ARCADIA_IN_STORE_COST_BPS",
                IN_STORE_COST_RATIO.bps(),
            )?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("ARCADIA_MAX_CONNECTIONS".to_string()));
        }
        for (key, bps) in [
            ("ARCADIA_ONLINE_COST_BPS", config.online_cost_bps),
            ("ARCADIA_IN_STORE_COST_BPS", config.in_store_cost_bps),
        ] {
            if bps > MAX_BPS {
                return Err(ConfigError::InvalidValue(key.to_string()));
            }
        }

        Ok(config)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.max_connections)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            online_cost_ratio: CostRatio::from_bps(self.online_cost_bps),
            in_store_cost_ratio: CostRatio::from_bps(self.in_store_cost_bps),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
