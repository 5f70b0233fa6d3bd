//! Application configuration loaded from environment variables.
//!
//! Everything has a local-dev default except the oracle URL, which is only
//! required when the HTTP oracle is selected.

use std::env;

/// Which persistence backend to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// JSON files under `data_dir`
    File,
    /// In-memory only, lost on restart
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Invalid {
                field: "STORE_BACKEND",
                message: format!("expected 'file' or 'memory', got '{other}'"),
            }),
        }
    }
}

/// Which reward oracle to settle against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMode {
    /// Deterministic in-process simulator
    Sim,
    /// Remote settlement endpoint
    Http,
}

impl OracleMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "sim" => Ok(OracleMode::Sim),
            "http" => Ok(OracleMode::Http),
            other => Err(ConfigError::Invalid {
                field: "ORACLE_MODE",
                message: format!("expected 'sim' or 'http', got '{other}'"),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Directory for the file store's namespaces
    pub data_dir: String,
    /// Persistence backend
    pub store_backend: StoreBackend,
    /// Reward oracle selection
    pub oracle_mode: OracleMode,
    /// Settlement endpoint, required for the HTTP oracle
    pub oracle_url: Option<String>,
    /// Seed for the simulated oracle's RNG
    pub oracle_seed: u64,
    /// Seconds between passive accrual polls
    pub poll_interval_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            data_dir: "./data".to_string(),
            store_backend: StoreBackend::Memory,
            oracle_mode: OracleMode::Sim,
            oracle_url: None,
            oracle_seed: 42,
            poll_interval_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => StoreBackend::parse(&value)?,
            Err(_) => StoreBackend::File,
        };
        let oracle_mode = match env::var("ORACLE_MODE") {
            Ok(value) => OracleMode::parse(&value)?,
            Err(_) => OracleMode::Sim,
        };
        let oracle_url = env::var("ORACLE_URL").ok();
        if oracle_mode == OracleMode::Http && oracle_url.is_none() {
            return Err(ConfigError::Missing("ORACLE_URL"));
        }

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);
        if poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "POLL_INTERVAL_SECS",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            store_backend,
            oracle_mode,
            oracle_url,
            oracle_seed: env::var("ORACLE_SEED")
                .unwrap_or_else(|_| "42".to_string())
                .parse()
                .unwrap_or(42),
            poll_interval_secs,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}
