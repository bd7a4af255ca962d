//! # bazaar-core: Pure Domain Logic for Bazaar
//!
//! Item value types, orders, validated builders and format mappers.
//! Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Data Flow                                 │
//! │                                                                         │
//! │  Already-parsed records (CSV row, JSON/XML document, SQL row)          │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  mapper   │─►│  builder  │─►│   types   │  │ validation│  │   │
//! │  │   │ row, doc, │  │ CakeBldr  │  │ Item      │  │  scalar   │  │   │
//! │  │   │ relational│  │ OrderBldr │  │ Order     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 bazaar-db (Database Layer)                      │   │
//! │  │       category repositories, order repository, factory          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cake, Book, Toy, Item, Identified, Order
//! - [`builder`] - Validated construction from loosely-typed field values
//! - [`mapper`] - Translation between external records and domain types
//! - [`validation`] - Scalar field rules shared by the builders
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::builder::{CakeBuilder, OrderBuilder};
//! use bazaar_core::Item;
//!
//! let cake = CakeBuilder::new()
//!     .kind("Birthday")
//!     .flavor("Vanilla")
//!     .filling("Strawberry")
//!     .size("Medium")
//!     .layers("2")
//!     .frosting_type("Buttercream")
//!     .frosting_flavor("Vanilla")
//!     .decoration_type("Sprinkles")
//!     .decoration_color("Rainbow")
//!     .custom_message("Happy")
//!     .shape("Round")
//!     .allergies("None")
//!     .special_ingredients("None")
//!     .packaging_type("Box")
//!     .build()
//!     .unwrap();
//!
//! let order = OrderBuilder::new()
//!     .id("order-1")
//!     .item(Item::Cake(cake))
//!     .price(30)
//!     .quantity(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(order.price(), 30);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod builder;
pub mod error;
pub mod mapper;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{BuildError, CoreError, MapError, ValidationError};
pub use types::*;
