//! # Repository Factory
//!
//! Turns a store mode and an item category into a ready order repository.
//!
//! ## Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_by_tag("sqlite:./shop.db", "cake")                             │
//! │       │                                                                 │
//! │       ├── "cake"  ──► ItemCategory::Cake   (else UnsupportedCategory)  │
//! │       ├── "sqlite:./shop.db" ──► StoreMode::Sqlite                     │
//! │       │                         (else UnsupportedStoreMode)            │
//! │       ▼                                                                 │
//! │  Database::new(mode.db_config())                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderRepository::new(pool, Cake).init()  ──► ready to use             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use bazaar_core::ItemCategory;

use crate::config::StoreConfig;
use crate::error::{DbError, DbResult};
use crate::pool::{Database, DbConfig};
use crate::repository::order::OrderRepository;

/// Database file used when `sqlite` is given without a path.
pub const DEFAULT_DATABASE_FILE: &str = "bazaar.db";

// =============================================================================
// Store Mode
// =============================================================================

/// Backing store for repositories.
///
/// ## Tags
/// - `sqlite` - file database at [`DEFAULT_DATABASE_FILE`]
/// - `sqlite:<path>` - file database at `<path>`
/// - `memory`, `in-memory`, `:memory:` - private in-memory database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    Sqlite { path: PathBuf },
    InMemory,
}

impl StoreMode {
    /// File-backed mode at `path`.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        StoreMode::Sqlite { path: path.into() }
    }

    /// Pool configuration for this mode.
    pub fn db_config(&self) -> DbConfig {
        match self {
            StoreMode::Sqlite { path } => DbConfig::new(path.clone()),
            StoreMode::InMemory => DbConfig::in_memory(),
        }
    }
}

impl Default for StoreMode {
    fn default() -> Self {
        StoreMode::sqlite(DEFAULT_DATABASE_FILE)
    }
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Sqlite { path } => write!(f, "sqlite:{}", path.display()),
            StoreMode::InMemory => write!(f, "memory"),
        }
    }
}

impl FromStr for StoreMode {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        match tag.to_lowercase().as_str() {
            "sqlite" => return Ok(StoreMode::default()),
            "memory" | "in-memory" | ":memory:" => return Ok(StoreMode::InMemory),
            _ => {}
        }

        // The path keeps its case
        match tag.split_once(':') {
            Some((scheme, path)) if scheme.eq_ignore_ascii_case("sqlite") && !path.trim().is_empty() => {
                Ok(StoreMode::sqlite(path.trim()))
            }
            _ => Err(DbError::UnsupportedStoreMode(s.to_string())),
        }
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Hands out initialized order repositories sharing one database.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    database: Database,
}

impl RepositoryFactory {
    /// Opens the store named by `mode` with default pool sizing.
    pub async fn connect(mode: &StoreMode) -> DbResult<Self> {
        info!(mode = %mode, "Connecting repository factory");
        Self::connect_with(mode.db_config()).await
    }

    /// Opens the store described by `config`, pool sizing included.
    pub async fn from_config(config: &StoreConfig) -> DbResult<Self> {
        info!(
            mode = %config.store_mode(),
            max_connections = config.max_connections,
            "Connecting repository factory"
        );
        Self::connect_with(config.db_config()).await
    }

    /// Opens a database with an explicit pool configuration.
    pub async fn connect_with(config: DbConfig) -> DbResult<Self> {
        let database = Database::new(config).await?;
        Ok(RepositoryFactory { database })
    }

    /// Wraps an already open database.
    pub fn new(database: Database) -> Self {
        RepositoryFactory { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns an order repository for `category` with its tables ensured.
    pub async fn create(&self, category: ItemCategory) -> DbResult<OrderRepository> {
        let repository = self.database.orders(category);
        repository.init().await?;
        Ok(repository)
    }

    /// Parses both tags, opens the store, and returns an initialized
    /// repository.
    ///
    /// The category is parsed first, so an unknown category fails without
    /// touching the store.
    ///
    /// ## Errors
    /// - `UnsupportedCategory` for a tag outside cake, book, toy
    /// - `UnsupportedStoreMode` for an unknown mode tag
    pub async fn create_by_tag(mode_tag: &str, category_tag: &str) -> DbResult<OrderRepository> {
        let category: ItemCategory = category_tag.parse()?;
        let mode: StoreMode = mode_tag.parse()?;
        RepositoryFactory::connect(&mode).await?.create(category).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreKind;
    use std::time::Duration;

    #[test]
    fn test_store_mode_parsing() {
        assert_eq!("sqlite".parse::<StoreMode>().unwrap(), StoreMode::default());
        assert_eq!("MEMORY".parse::<StoreMode>().unwrap(), StoreMode::InMemory);
        assert_eq!(":memory:".parse::<StoreMode>().unwrap(), StoreMode::InMemory);
        assert_eq!(
            "sqlite:./Data/Shop.db".parse::<StoreMode>().unwrap(),
            StoreMode::sqlite("./Data/Shop.db")
        );

        for tag in ["postgres", "", "sqlite:", "mongodb:cakes"] {
            assert!(matches!(
                tag.parse::<StoreMode>(),
                Err(DbError::UnsupportedStoreMode(_))
            ));
        }
    }

    #[test]
    fn test_store_mode_display_round_trips() {
        for mode in [StoreMode::InMemory, StoreMode::sqlite("/tmp/bazaar.db")] {
            assert_eq!(mode.to_string().parse::<StoreMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_db_config_per_mode() {
        assert!(StoreMode::InMemory.db_config().is_in_memory());
        let config = StoreMode::sqlite("/tmp/bazaar.db").db_config();
        assert_eq!(config.database_path, PathBuf::from("/tmp/bazaar.db"));
    }

    #[tokio::test]
    async fn test_create_returns_initialized_repository() {
        let factory = RepositoryFactory::connect(&StoreMode::InMemory).await.unwrap();

        for category in ItemCategory::ALL {
            let orders = factory.create(category).await.unwrap();
            assert_eq!(orders.category(), category);
            assert_eq!(orders.count().await.unwrap(), 0);
            assert!(orders.get_all().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_from_config_sizes_the_pool() {
        let path = std::env::temp_dir().join(format!("bazaar-factory-{}.db", uuid::Uuid::new_v4()));
        let config = StoreConfig {
            database_path: path.clone(),
            max_connections: 2,
            connect_timeout_secs: 1,
            ..StoreConfig::default()
        };

        let factory = RepositoryFactory::from_config(&config).await.unwrap();
        let options = factory.database().pool().options();
        assert_eq!(options.get_max_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(1));

        factory.database().close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_from_config_memory_keeps_one_connection() {
        let config = StoreConfig {
            mode: StoreKind::Memory,
            max_connections: 8,
            ..StoreConfig::default()
        };

        let factory = RepositoryFactory::from_config(&config).await.unwrap();
        assert_eq!(factory.database().pool().options().get_max_connections(), 1);
        assert_eq!(factory.create(ItemCategory::Cake).await.unwrap().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_by_tag() {
        let orders = RepositoryFactory::create_by_tag("memory", " Book ").await.unwrap();
        assert_eq!(orders.category(), ItemCategory::Book);

        assert!(matches!(
            RepositoryFactory::create_by_tag("memory", "lamp").await,
            Err(DbError::UnsupportedCategory(_))
        ));
        assert!(matches!(
            RepositoryFactory::create_by_tag("redis", "cake").await,
            Err(DbError::UnsupportedStoreMode(_))
        ));
    }
}
