//! # Repository Module
//!
//! Store-backed repositories for items and orders.
//!
//! ## Repository Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  RepositoryFactory::create(category)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderRepository (order.rs)                                            │
//! │  ├── create / get / get_all / update / delete / count                  │
//! │  │        │                                                             │
//! │  │        │  same connection, same transaction                          │
//! │  │        ▼                                                             │
//! │  └── CategoryRepository (item.rs)                                      │
//! │       ├── Cake → ItemRepository<Cake> (cake.rs)  → cakes table        │
//! │       ├── Book → ItemRepository<Book> (book.rs)  → books table        │
//! │       └── Toy  → ItemRepository<Toy>  (toy.rs)   → toys table         │
//! │                                                                         │
//! │  orders table: one for all categories, keyed by item_category          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`OrderRepository`](order::OrderRepository) - Orders with their items
//! - [`CategoryRepository`](item::CategoryRepository) - Items of a runtime category
//! - [`CakeRepository`](cake::CakeRepository),
//!   [`BookRepository`](book::BookRepository),
//!   [`ToyRepository`](toy::ToyRepository) - Typed item tables

pub mod book;
pub mod cake;
pub mod item;
pub mod order;
pub mod toy;
