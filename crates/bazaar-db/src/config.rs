//! # Store Configuration
//!
//! Where the repositories keep their data and how the pool is sized.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BAZAAR_STORE_MODE=memory | sqlite | sqlite:<path>                  │
//! │     BAZAAR_DB_PATH=./data/bazaar.db                                    │
//! │     BAZAAR_MAX_CONNECTIONS=8                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/bazaar/store.toml (Linux)                                │
//! │     ~/Library/Application Support/com.bazaar.bazaar/store.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     sqlite at ./bazaar.db, 5 connections, 30s timeout                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! mode = "sqlite"  # sqlite | memory
//! database_path = "./bazaar.db"
//! max_connections = 5
//! connect_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::factory::{StoreMode, DEFAULT_DATABASE_FILE};
use crate::pool::DbConfig;

pub const ENV_STORE_MODE: &str = "BAZAAR_STORE_MODE";
pub const ENV_DB_PATH: &str = "BAZAAR_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "BAZAAR_MAX_CONNECTIONS";

// =============================================================================
// Store Kind
// =============================================================================

/// Kind of backing store, as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// File database at `database_path`.
    #[default]
    Sqlite,

    /// Private in-memory database; `database_path` is ignored.
    Memory,
}

// =============================================================================
// Store Config
// =============================================================================

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub mode: StoreKind,

    /// SQLite file, created on first connect.
    /// Default: ./bazaar.db
    pub database_path: PathBuf,

    /// Pool size for file databases. In-memory stores always use one.
    /// Default: 5
    pub max_connections: u32,

    /// How long to wait for a free connection (seconds).
    /// Default: 30
    pub connect_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            mode: StoreKind::default(),
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            max_connections: 5,
            connect_timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Override with the TOML file (if it exists)
    /// 3. Override with environment variables
    /// 4. Validate the result
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    DbError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file body. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> DbResult<Self> {
        toml::from_str(contents).map_err(|e| DbError::Config(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        if self.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.mode == StoreKind::Sqlite && self.database_path.as_os_str().is_empty() {
            return Err(DbError::Config(
                "database_path is required for the sqlite store".into(),
            ));
        }

        Ok(())
    }

    /// The store mode this configuration selects.
    pub fn store_mode(&self) -> StoreMode {
        match self.mode {
            StoreKind::Sqlite => StoreMode::sqlite(self.database_path.clone()),
            StoreKind::Memory => StoreMode::InMemory,
        }
    }

    /// Pool configuration with this config's sizing applied.
    pub fn db_config(&self) -> DbConfig {
        let config = self
            .store_mode()
            .db_config()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs));

        if config.is_in_memory() {
            config
        } else {
            config
                .max_connections(self.max_connections)
                .min_connections(self.max_connections.min(1))
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// Values that don't parse are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(tag) = lookup(ENV_STORE_MODE) {
            match tag.parse::<StoreMode>() {
                Ok(StoreMode::InMemory) => {
                    debug!("Overriding store mode from environment: memory");
                    self.mode = StoreKind::Memory;
                }
                Ok(StoreMode::Sqlite { path }) => {
                    debug!(path = %path.display(), "Overriding store mode from environment: sqlite");
                    self.mode = StoreKind::Sqlite;
                    // A bare "sqlite" keeps the configured path
                    if !tag.trim().eq_ignore_ascii_case("sqlite") {
                        self.database_path = path;
                    }
                }
                Err(e) => warn!(value = %tag, "Ignoring {}: {}", ENV_STORE_MODE, e),
            }
        }

        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }

        if let Some(max) = lookup(ENV_MAX_CONNECTIONS) {
            match max.trim().parse::<u32>() {
                Ok(max) if max > 0 => {
                    debug!(max_connections = max, "Overriding pool size from environment");
                    self.max_connections = max;
                }
                _ => warn!(value = %max, "Ignoring invalid {}", ENV_MAX_CONNECTIONS),
            }
        }
    }

    /// Returns the default config file path for the current platform.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bazaar", "bazaar")
            .map(|dirs| dirs.config_dir().join("store.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.mode, StoreKind::Sqlite);
        assert_eq!(config.store_mode(), StoreMode::sqlite("bazaar.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = StoreConfig::from_toml("mode = \"memory\"\nmax_connections = 3\n").unwrap();
        assert_eq!(config.mode, StoreKind::Memory);
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.store_mode(), StoreMode::InMemory);
    }

    #[test]
    fn test_from_toml_rejects_unknown_mode() {
        let err = StoreConfig::from_toml("mode = \"postgres\"").unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StoreConfig::default();
        config.apply_overrides(overrides(&[
            (ENV_STORE_MODE, "sqlite:/var/lib/bazaar/shop.db"),
            (ENV_MAX_CONNECTIONS, "8"),
        ]));
        assert_eq!(config.database_path, PathBuf::from("/var/lib/bazaar/shop.db"));
        assert_eq!(config.max_connections, 8);

        // An explicit path wins over the mode's path
        config.apply_overrides(overrides(&[
            (ENV_STORE_MODE, "sqlite"),
            (ENV_DB_PATH, "./other.db"),
        ]));
        assert_eq!(config.database_path, PathBuf::from("./other.db"));

        config.apply_overrides(overrides(&[(ENV_STORE_MODE, "memory")]));
        assert_eq!(config.store_mode(), StoreMode::InMemory);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = StoreConfig::default();
        config.apply_overrides(overrides(&[
            (ENV_STORE_MODE, "postgres"),
            (ENV_MAX_CONNECTIONS, "0"),
        ]));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_validate() {
        let config = StoreConfig {
            max_connections: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(DbError::Config(_))));

        let config = StoreConfig {
            database_path: PathBuf::new(),
            ..StoreConfig::default()
        };
        assert!(config.validate().is_err());

        let config = StoreConfig {
            mode: StoreKind::Memory,
            database_path: PathBuf::new(),
            ..StoreConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_db_config_sizing() {
        let config = StoreConfig {
            max_connections: 8,
            connect_timeout_secs: 2,
            ..StoreConfig::default()
        };
        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.connect_timeout, Duration::from_secs(2));

        let memory = StoreConfig {
            mode: StoreKind::Memory,
            max_connections: 8,
            ..StoreConfig::default()
        };
        assert_eq!(memory.db_config().max_connections, 1);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("bazaar-store-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "database_path = \"./from-file.db\"\n").unwrap();

        let config = StoreConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.connect_timeout_secs, 30);
        if std::env::var(ENV_DB_PATH).is_err() && std::env::var(ENV_STORE_MODE).is_err() {
            assert_eq!(config.database_path, PathBuf::from("./from-file.db"));
        }
    }
}
