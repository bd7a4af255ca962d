//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├── NotFound              → "does not exist" (404-style)          │
//! │       ├── Store                 → "could not determine" (retry-style)   │
//! │       ├── ConsistencyViolation  → corrupted cross-table state           │
//! │       └── InvalidItem / Map     → bad input, never retried              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::{CoreError, MapError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row matches the id.
    ///
    /// ## When This Occurs
    /// - `get` / `delete` on an unknown id
    /// - `update` affecting zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The entity cannot be written as given.
    ///
    /// ## When This Occurs
    /// - Item category differs from the repository's category
    /// - `update` names an item the order does not reference
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Schema setup failed.
    #[error("Failed to initialize {what}")]
    Initialization {
        what: String,
        #[source]
        source: sqlx::Error,
    },

    /// Any other failure of the underlying store.
    #[error("Store error while {context}")]
    Store {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// An order row references an item row that does not exist.
    #[error("Order {order_id} references missing {item_category} item {item_id}")]
    ConsistencyViolation {
        order_id: String,
        item_category: String,
        item_id: String,
    },

    /// A stored row could not be mapped back to a domain value.
    #[error("Stored row is invalid: {0}")]
    Map(#[from] MapError),

    /// Category tag outside {cake, book, toy}.
    #[error("Unsupported item category: {0}")]
    UnsupportedCategory(String),

    /// Store mode tag outside the supported backing stores.
    #[error("Unsupported store mode: '{0}'. Valid options: sqlite, sqlite:<path>, memory")]
    UnsupportedStoreMode(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Store configuration could not be loaded or is invalid.
    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Returns a mapper wrapping a sqlx error as `Store` with `context`.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// query.execute(&mut *conn).await.map_err(DbError::store("inserting order"))?;
    /// ```
    pub fn store(context: impl Into<String>) -> impl FnOnce(sqlx::Error) -> DbError {
        let context = context.into();
        move |source| DbError::Store { context, source }
    }

    /// Returns a mapper wrapping a sqlx error as `Initialization` of `what`.
    pub fn initialization(what: impl Into<String>) -> impl FnOnce(sqlx::Error) -> DbError {
        let what = what.into();
        move |source| DbError::Initialization { what, source }
    }

    /// True for "does not exist", as opposed to "could not determine".
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedCategory(tag) => DbError::UnsupportedCategory(tag),
            CoreError::Validation(err) => DbError::Map(MapError::Validation(err)),
            CoreError::Build(err) => DbError::Map(MapError::Build(err)),
            CoreError::Map(err) => DbError::Map(err),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_store_keeps_source() {
        let err = DbError::store("inserting order")(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "Store error while inserting order");
        assert!(err.source().is_some());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Order", "order-1");
        assert_eq!(err.to_string(), "Order not found: order-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_core_error_conversion() {
        let err: DbError = CoreError::UnsupportedCategory("lamp".to_string()).into();
        assert!(matches!(err, DbError::UnsupportedCategory(ref tag) if tag == "lamp"));
    }
}
