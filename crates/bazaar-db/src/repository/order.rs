//! # Order Repository
//!
//! Keeps an order row and its item row consistent as one unit.
//!
//! ## Transactions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create(order)                      delete(id)                          │
//! │  ─────────────                      ──────────                          │
//! │  BEGIN                              BEGIN                               │
//! │  INSERT INTO cakes ...              SELECT order row ── none? NotFound  │
//! │  INSERT INTO orders ...             DELETE FROM orders                  │
//! │  COMMIT                             DELETE FROM cakes (manual cascade)  │
//! │                                     COMMIT                              │
//! │                                                                         │
//! │  Any failure ──► ROLLBACK ──► caller sees first error                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `orders.item_id` is a logical reference into the table named by
//! `orders.item_category`; SQLite does not enforce it. An order whose item
//! has gone missing is reported as `ConsistencyViolation`, never skipped.
//!
//! Reads run in a transaction too, so the order row and its item row come
//! from the same snapshot.
//!
//! Every transaction runs on a connection of its own from `pool.begin()`.
//! Dropping a transaction without committing rolls it back, so the
//! connection returns to the pool clean on every exit path.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

use bazaar_core::mapper::{Mapper, OrderRow, OrderRowMapper, ResolvedOrderRow};
use bazaar_core::validation::validate_id;
use bazaar_core::{IdentifiableItem, IdentifiableOrder, ItemCategory, MapError};

use crate::error::{DbError, DbResult};
use crate::repository::item::CategoryRepository;

const CREATE_ORDERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS orders (
        id TEXT PRIMARY KEY,
        quantity INTEGER NOT NULL,
        price INTEGER NOT NULL,
        item_category TEXT NOT NULL,
        item_id TEXT NOT NULL
    )
"#;

const INSERT_ORDER: &str = r#"
    INSERT INTO orders (id, quantity, price, item_category, item_id)
    VALUES (?1, ?2, ?3, ?4, ?5)
"#;

const SELECT_ORDER_BY_ID: &str = r#"
    SELECT id, quantity, price, item_category, item_id
    FROM orders
    WHERE id = ?1 AND item_category = ?2
"#;

const SELECT_ORDERS_BY_CATEGORY: &str = r#"
    SELECT id, quantity, price, item_category, item_id
    FROM orders
    WHERE item_category = ?1
    ORDER BY id
"#;

const UPDATE_ORDER: &str = "UPDATE orders SET quantity = ?2, price = ?3 WHERE id = ?1";

const DELETE_ORDER: &str = "DELETE FROM orders WHERE id = ?1";

const COUNT_ORDERS: &str = "SELECT COUNT(*) FROM orders WHERE item_category = ?1";

/// Repository for orders of one item category.
///
/// ## Usage
/// ```rust,ignore
/// let orders = RepositoryFactory::new(db).create(ItemCategory::Cake).await?;
///
/// let id = orders.create(&order).await?;
/// let stored = orders.get(&id).await?;
/// orders.delete(&id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    items: CategoryRepository,
}

impl OrderRepository {
    /// Creates a new, uninitialized repository.
    pub fn new(pool: SqlitePool, category: ItemCategory) -> Self {
        let items = CategoryRepository::new(category, pool.clone());
        OrderRepository { pool, items }
    }

    pub fn category(&self) -> ItemCategory {
        self.items.category()
    }

    /// The category repository this repository writes items through.
    pub fn items(&self) -> &CategoryRepository {
        &self.items
    }

    /// Ensures the item table, then the `orders` table. Idempotent.
    pub async fn init(&self) -> DbResult<()> {
        self.items.init().await?;

        sqlx::query(CREATE_ORDERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(DbError::initialization("orders"))?;

        info!(category = %self.category(), "Orders table ensured");
        Ok(())
    }

    // =========================================================================
    // Writes (transactional)
    // =========================================================================

    /// Persists the item and the order together, returning the order id.
    ///
    /// ## Errors
    /// - `InvalidItem` if the item is of another category
    /// - `Store` if either insert fails; neither row is left behind
    pub async fn create(&self, order: &IdentifiableOrder) -> DbResult<String> {
        self.check_category(order)?;

        let mut tx = self.begin("create").await?;
        let result = self.insert_in(&mut *tx, order).await;
        match result {
            Ok(()) => {
                commit(tx, "create").await?;
                info!(order_id = %order.id(), item_id = %order.item_id(), "Order created");
                Ok(order.id().to_string())
            }
            Err(err) => {
                rollback(tx, "create", &err).await;
                Err(err)
            }
        }
    }

    /// Rewrites the item and the order's price and quantity together.
    ///
    /// The order must already reference this item; an order can never be
    /// moved to another item through this path.
    pub async fn update(&self, order: &IdentifiableOrder) -> DbResult<()> {
        self.check_category(order)?;

        let mut tx = self.begin("update").await?;
        let result = self.update_in(&mut *tx, order).await;
        match result {
            Ok(()) => {
                commit(tx, "update").await?;
                debug!(order_id = %order.id(), "Order updated");
                Ok(())
            }
            Err(err) => {
                rollback(tx, "update", &err).await;
                Err(err)
            }
        }
    }

    /// Deletes the order, then its item.
    ///
    /// ## Errors
    /// - `NotFound` if no such order exists; nothing is deleted
    /// - `ConsistencyViolation` if the item row is already gone; the order
    ///   row is kept
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.begin("delete").await?;
        let result = self.delete_in(&mut *tx, id).await;
        match result {
            Ok(item_id) => {
                commit(tx, "delete").await?;
                info!(order_id = %id, item_id = %item_id, "Order deleted");
                Ok(())
            }
            Err(err) => {
                rollback(tx, "delete", &err).await;
                Err(err)
            }
        }
    }

    async fn insert_in(&self, conn: &mut SqliteConnection, order: &IdentifiableOrder) -> DbResult<()> {
        validate_id("id", order.id()).map_err(MapError::from)?;

        let item_id = self.items.create_in(&mut *conn, order.item()).await?;

        sqlx::query(INSERT_ORDER)
            .bind(order.id())
            .bind(order.quantity())
            .bind(order.price())
            .bind(self.category().as_str())
            .bind(&item_id)
            .execute(&mut *conn)
            .await
            .map_err(DbError::store(format!("inserting order {}", order.id())))?;

        Ok(())
    }

    async fn update_in(&self, conn: &mut SqliteConnection, order: &IdentifiableOrder) -> DbResult<()> {
        let row = self.fetch_row(&mut *conn, order.id()).await?;
        if row.item_id != order.item_id() {
            return Err(DbError::InvalidItem(format!(
                "order {} references {} item {}, not {}",
                row.id,
                row.item_category,
                row.item_id,
                order.item_id()
            )));
        }

        self.items
            .update_in(&mut *conn, order.item())
            .await
            .map_err(|err| self.dangling(&row, err))?;

        sqlx::query(UPDATE_ORDER)
            .bind(order.id())
            .bind(order.quantity())
            .bind(order.price())
            .execute(&mut *conn)
            .await
            .map_err(DbError::store(format!("updating order {}", order.id())))?;

        Ok(())
    }

    /// Returns the id of the deleted item.
    async fn delete_in(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<String> {
        let row = self.fetch_row(&mut *conn, id).await?;

        sqlx::query(DELETE_ORDER)
            .bind(&row.id)
            .execute(&mut *conn)
            .await
            .map_err(DbError::store(format!("deleting order {id}")))?;

        self.items
            .delete_in(&mut *conn, &row.item_id)
            .await
            .map_err(|err| self.dangling(&row, err))?;

        Ok(row.item_id)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetches one order with its item.
    ///
    /// Both rows are read in one transaction, so a concurrent delete shows
    /// up as `NotFound` rather than as a dangling order.
    ///
    /// ## Errors
    /// - `NotFound` if no order of this category has the id
    /// - `ConsistencyViolation` if the order's item row is missing
    pub async fn get(&self, id: &str) -> DbResult<IdentifiableOrder> {
        let mut tx = self.begin("get").await?;
        let order = self.get_in(&mut *tx, id).await?;
        commit(tx, "get").await?;
        Ok(order)
    }

    /// Fetches every order of this category with its item, ordered by id.
    ///
    /// Orders and items come from one transaction's snapshot.
    ///
    /// ## Errors
    /// `ConsistencyViolation` if any order's item row is missing.
    pub async fn get_all(&self) -> DbResult<Vec<IdentifiableOrder>> {
        let mut tx = self.begin("get_all").await?;
        let orders = self.get_all_in(&mut *tx).await?;
        commit(tx, "get_all").await?;
        Ok(orders)
    }

    async fn get_in(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<IdentifiableOrder> {
        let row = self.fetch_row(&mut *conn, id).await?;
        let item = self
            .items
            .get_in(&mut *conn, &row.item_id)
            .await
            .map_err(|err| self.dangling(&row, err))?;

        resolve(row, item)
    }

    async fn get_all_in(&self, conn: &mut SqliteConnection) -> DbResult<Vec<IdentifiableOrder>> {
        let rows = sqlx::query_as::<_, OrderRow>(SELECT_ORDERS_BY_CATEGORY)
            .bind(self.category().as_str())
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::store("listing orders"))?;

        let mut items: HashMap<String, IdentifiableItem> = self
            .items
            .get_all_in(&mut *conn)
            .await?
            .into_iter()
            .map(|item| (item.id().to_string(), item))
            .collect();

        debug!(
            category = %self.category(),
            orders = rows.len(),
            items = items.len(),
            "Joining orders with items"
        );

        rows.into_iter()
            .map(|row| match items.remove(&row.item_id) {
                Some(item) => resolve(row, item),
                None => Err(self.violation(&row)),
            })
            .collect()
    }

    /// Number of orders of this category.
    pub async fn count(&self) -> DbResult<i64> {
        sqlx::query_scalar::<_, i64>(COUNT_ORDERS)
            .bind(self.category().as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::store("counting orders"))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn begin(&self, operation: &str) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(DbError::store(format!("beginning {operation} transaction")))
    }

    async fn fetch_row(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<OrderRow> {
        debug!(order_id = %id, "Fetching order row");

        sqlx::query_as::<_, OrderRow>(SELECT_ORDER_BY_ID)
            .bind(id)
            .bind(self.category().as_str())
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::store(format!("fetching order {id}")))?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    fn check_category(&self, order: &IdentifiableOrder) -> DbResult<()> {
        if order.category() != self.category() {
            return Err(DbError::InvalidItem(format!(
                "{} order repository cannot store order {} for a {} item",
                self.category(),
                order.id(),
                order.category()
            )));
        }
        Ok(())
    }

    fn violation(&self, row: &OrderRow) -> DbError {
        error!(
            order_id = %row.id,
            item_category = %row.item_category,
            item_id = %row.item_id,
            "Order references a missing item"
        );
        DbError::ConsistencyViolation {
            order_id: row.id.clone(),
            item_category: row.item_category.clone(),
            item_id: row.item_id.clone(),
        }
    }

    /// Turns "item not found" for an existing order into a violation.
    fn dangling(&self, row: &OrderRow, err: DbError) -> DbError {
        if err.is_not_found() {
            self.violation(row)
        } else {
            err
        }
    }
}

fn resolve(row: OrderRow, item: IdentifiableItem) -> DbResult<IdentifiableOrder> {
    Ok(OrderRowMapper.map(&ResolvedOrderRow { row, item })?)
}

async fn commit(tx: Transaction<'static, Sqlite>, operation: &str) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(DbError::store(format!("committing {operation} transaction")))
}

/// Rolls back after `cause`. A failed rollback is logged; `cause` is what
/// the caller reports.
async fn rollback(tx: Transaction<'static, Sqlite>, operation: &str, cause: &DbError) {
    debug!(operation, error = %cause, "Rolling back transaction");
    if let Err(rollback_err) = tx.rollback().await {
        warn!(
            operation,
            error = %rollback_err,
            cause = %cause,
            "Rollback failed"
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
