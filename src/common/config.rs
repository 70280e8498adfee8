//! Environment-based Configuration
//!
//! Loads the runtime configuration of the callback processor from environment
//! variables (a `.env` file is honoured by the binary).
//!
//! # Environment Variables
//!
//! - `STAKEIBC_NETWORK` - "mainnet", "testnet", or "local" (default: "local")
//! - `STAKEIBC_STORE` - "memory" or "sqlite" (default: "sqlite")
//! - `STAKEIBC_DB_PATH` - SQLite database path (default: "data/stakeibc.db")
//! - `STAKEIBC_LOG_LEVEL` - Logging level (trace, debug, info, warn, error)
//! - `STAKEIBC_JSON_LOGS` - Set to "1" for JSON logs (always on for mainnet)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("network mismatch: expected {0}, got {1}")]
    NetworkMismatch(String, String),

    #[error("in-memory ledger store not allowed on {0}")]
    VolatileStoreNotAllowed(String),
}

/// Network environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Local,
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "local" | "localnet" | "dev" => Ok(Network::Local),
            _ => Err(ConfigError::InvalidValue(
                "STAKEIBC_NETWORK".to_string(),
                format!("unknown network: {}", s),
            )),
        }
    }
}

impl Network {
    /// Whether a volatile in-memory ledger is acceptable on this network
    pub fn allows_memory_store(&self) -> bool {
        matches!(self, Network::Local | Network::Testnet)
    }
}

const DEFAULT_DB_PATH: &str = "data/stakeibc.db";

/// Ledger store backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Discarded when the process exits
    Memory,
    Sqlite { path: PathBuf },
}

impl StoreBackend {
    pub fn is_volatile(&self) -> bool {
        matches!(self, StoreBackend::Memory)
    }
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Sqlite {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct StakeIbcConfig {
    pub network: Network,
    pub store: StoreBackend,
    pub log_level: String,
    pub json_logs: bool,
}

impl StakeIbcConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network: Network = lookup("STAKEIBC_NETWORK")
            .unwrap_or_else(|| "local".to_string())
            .parse()?;

        let store = match lookup("STAKEIBC_STORE")
            .unwrap_or_else(|| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "sqlite" => StoreBackend::Sqlite {
                path: lookup("STAKEIBC_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            },
            other => {
                return Err(ConfigError::InvalidValue(
                    "STAKEIBC_STORE".to_string(),
                    format!("unknown store: {} (use 'memory' or 'sqlite')", other),
                ))
            }
        };

        if store.is_volatile() && !network.allows_memory_store() {
            return Err(ConfigError::VolatileStoreNotAllowed(format!("{:?}", network)));
        }

        let log_level = lookup("STAKEIBC_LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let json_logs = network == Network::Mainnet
            || lookup("STAKEIBC_JSON_LOGS").is_some_and(|v| v == "1");

        Ok(Self {
            network,
            store,
            log_level,
            json_logs,
        })
    }

    /// Validate configuration for production readiness
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.network != Network::Mainnet {
            return Err(ConfigError::NetworkMismatch(
                "mainnet".to_string(),
                format!("{:?}", self.network),
            ));
        }

        if self.store.is_volatile() {
            return Err(ConfigError::VolatileStoreNotAllowed("mainnet".to_string()));
        }

        Ok(())
    }

    /// Print configuration summary
    ///
    /// Goes to stderr so command output on stdout stays machine-readable.
    pub fn print_summary(&self) {
        eprintln!("=== stakeibc Configuration ===");
        eprintln!("Network: {:?}", self.network);
        match &self.store {
            StoreBackend::Memory => eprintln!("Store: memory (not persisted)"),
            StoreBackend::Sqlite { path } => eprintln!("Store: sqlite ({})", path.display()),
        }
        eprintln!("Log Level: {}", self.log_level);
        eprintln!("JSON Logs: {}", self.json_logs);
        eprintln!("==============================");
    }
}

impl Default for StakeIbcConfig {
    fn default() -> Self {
        Self {
            network: Network::Local,
            store: StoreBackend::default(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parsing() {
        assert!(matches!("mainnet".parse::<Network>(), Ok(Network::Mainnet)));
        assert!(matches!("testnet".parse::<Network>(), Ok(Network::Testnet)));
        assert!(matches!("local".parse::<Network>(), Ok(Network::Local)));
        assert!("invalid".parse::<Network>().is_err());
    }

    #[test]
    fn test_memory_store_restrictions() {
        assert!(Network::Local.allows_memory_store());
        assert!(!Network::Mainnet.allows_memory_store());

        let config = StakeIbcConfig {
            network: Network::Mainnet,
            store: StoreBackend::Memory,
            ..StakeIbcConfig::default()
        };
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::VolatileStoreNotAllowed(_))
        ));

        let config = StakeIbcConfig {
            network: Network::Mainnet,
            store: StoreBackend::Sqlite { path: PathBuf::from("ledger.db") },
            ..StakeIbcConfig::default()
        };
        assert!(config.validate_for_production().is_ok());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults_to_persistent_store() {
        let config = StakeIbcConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.network, Network::Local);
        assert_eq!(
            config.store,
            StoreBackend::Sqlite { path: PathBuf::from("data/stakeibc.db") }
        );
        assert!(!config.json_logs);
    }

    #[test]
    fn test_store_selection_from_vars() {
        let config = StakeIbcConfig::from_lookup(lookup(&[
            ("STAKEIBC_STORE", "memory"),
            ("STAKEIBC_JSON_LOGS", "1"),
        ]))
        .unwrap();
        assert!(config.store.is_volatile());
        assert!(config.json_logs);

        let config = StakeIbcConfig::from_lookup(lookup(&[
            ("STAKEIBC_NETWORK", "mainnet"),
            ("STAKEIBC_DB_PATH", "/var/lib/stakeibc/ledger.db"),
        ]))
        .unwrap();
        assert_eq!(
            config.store,
            StoreBackend::Sqlite { path: PathBuf::from("/var/lib/stakeibc/ledger.db") }
        );
        assert!(config.json_logs);

        let err = StakeIbcConfig::from_lookup(lookup(&[
            ("STAKEIBC_NETWORK", "mainnet"),
            ("STAKEIBC_STORE", "memory"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::VolatileStoreNotAllowed(_)));

        assert!(StakeIbcConfig::from_lookup(lookup(&[("STAKEIBC_STORE", "redis")])).is_err());
    }
}
