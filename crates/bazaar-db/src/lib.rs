//! # bazaar-db: Persistence Layer for Bazaar
//!
//! Stores orders and their items (cakes, books, toys) in SQLite through
//! sqlx, keeping each order and its item consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Data Flow                                 │
//! │                                                                         │
//! │  CSV row / JSON / XML document                                         │
//! │       │  bazaar-core mappers + builders                                │
//! │       ▼                                                                 │
//! │  IdentifiableOrder                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bazaar-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │   Factory    │  │   │
//! │  │   │   (pool.rs)   │    │ (repository/)  │    │ (factory.rs) │  │   │
//! │  │   │               │    │                │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ OrderRepo      │◄───│ StoreMode    │  │   │
//! │  │   │ Transactions  │    │ CategoryRepo   │    │ StoreConfig  │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite: cakes, books, toys, orders                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Store configuration from file and environment
//! - [`factory`] - Store mode selection and repository creation
//! - [`error`] - Database error types
//! - [`repository`] - Item and order repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_core::ItemCategory;
//! use bazaar_db::{RepositoryFactory, StoreConfig};
//!
//! let config = StoreConfig::load(None)?;
//! let factory = RepositoryFactory::from_config(&config).await?;
//!
//! let cakes = factory.create(ItemCategory::Cake).await?;
//! let id = cakes.create(&order).await?;
//! let stored = cakes.get(&id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod factory;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{StoreConfig, StoreKind};
pub use error::{DbError, DbResult};
pub use factory::{RepositoryFactory, StoreMode};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::book::BookRepository;
pub use repository::cake::CakeRepository;
pub use repository::item::{CategoryRepository, ItemRepository, StoredItem};
pub use repository::order::OrderRepository;
pub use repository::toy::ToyRepository;
