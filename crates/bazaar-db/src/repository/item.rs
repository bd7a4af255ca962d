//! # Category Repositories
//!
//! One table per item category, one generic repository over all of them.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  StoredItem (cake.rs / book.rs / toy.rs)                               │
//! │  ├── SQL for its table                                                 │
//! │  ├── Row type + relational mapper (bazaar-core)                        │
//! │  └── column values in SQL order                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ItemRepository<T: StoredItem>                                         │
//! │  ├── create / get / get_all / update / delete   (own connection)       │
//! │  └── create_in / get_in / ...                   (caller's connection)  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  CategoryRepository  = Cake | Book | Toy   (runtime dispatch on Item)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `*_in` variants run on a connection the caller already holds, which
//! is how the order repository puts item writes inside its transaction.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use std::marker::PhantomData;
use tracing::{debug, info};

use bazaar_core::mapper::Mapper;
use bazaar_core::{IdentifiableItem, Identified, Item, ItemCategory, MapError};

use crate::error::{DbError, DbResult};
use crate::repository::book::BookRepository;
use crate::repository::cake::CakeRepository;
use crate::repository::toy::ToyRepository;

// =============================================================================
// Stored Item
// =============================================================================

/// An item type with a backing table.
///
/// `INSERT` binds `id` then the columns; `UPDATE` binds the columns then
/// `id`. Both take the columns in [`StoredItem::columns`] order.
pub trait StoredItem: Clone + Send + Sync + Sized + 'static {
    type Row: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;
    type RowMapper: Mapper<External = Self::Row, Domain = Identified<Self>>;

    const CATEGORY: ItemCategory;
    const ROW_MAPPER: Self::RowMapper;

    const CREATE_TABLE: &'static str;
    const INSERT: &'static str;
    const SELECT_BY_ID: &'static str;
    const SELECT_ALL: &'static str;
    const UPDATE: &'static str;
    const DELETE: &'static str;

    /// Column values of `row`, excluding `id`.
    fn columns(row: &Self::Row) -> Vec<&str>;

    /// Widens into the item sum type.
    fn into_item(self) -> Item;

    /// Narrows from the item sum type.
    fn from_item(item: &Item) -> Option<&Self>;
}

// =============================================================================
// Generic Repository
// =============================================================================

/// Repository for one category's table.
///
/// ## Usage
/// ```rust,ignore
/// let cakes = db.cakes();
/// cakes.init().await?;
/// let id = cakes.create(&cake).await?;
/// let stored = cakes.get(&id).await?;
/// ```
#[derive(Debug)]
pub struct ItemRepository<T> {
    pool: SqlitePool,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for ItemRepository<T> {
    fn clone(&self) -> Self {
        ItemRepository {
            pool: self.pool.clone(),
            _item: PhantomData,
        }
    }
}

impl<T: StoredItem> ItemRepository<T> {
    /// Creates a new repository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository {
            pool,
            _item: PhantomData,
        }
    }

    pub fn category(&self) -> ItemCategory {
        T::CATEGORY
    }

    fn entity(&self) -> &'static str {
        T::CATEGORY.entity_name()
    }

    async fn connection(&self) -> DbResult<sqlx::pool::PoolConnection<sqlx::Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(DbError::store("acquiring a connection"))
    }

    // =========================================================================
    // Pool-scoped operations
    // =========================================================================

    /// Ensures the table exists. Idempotent.
    pub async fn init(&self) -> DbResult<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(DbError::initialization(T::CATEGORY.table_name()))?;
        self.init_in(&mut conn).await
    }

    /// Inserts `item`, returning its id.
    pub async fn create(&self, item: &Identified<T>) -> DbResult<String> {
        let mut conn = self.connection().await?;
        self.create_in(&mut conn, item).await
    }

    /// Fetches one item.
    pub async fn get(&self, id: &str) -> DbResult<Identified<T>> {
        let mut conn = self.connection().await?;
        self.get_in(&mut conn, id).await
    }

    /// Fetches every item, ordered by id.
    pub async fn get_all(&self) -> DbResult<Vec<Identified<T>>> {
        let mut conn = self.connection().await?;
        self.get_all_in(&mut conn).await
    }

    /// Rewrites every column of an existing item.
    pub async fn update(&self, item: &Identified<T>) -> DbResult<()> {
        let mut conn = self.connection().await?;
        self.update_in(&mut conn, item).await
    }

    /// Deletes one item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut conn = self.connection().await?;
        self.delete_in(&mut conn, id).await
    }

    // =========================================================================
    // Connection-scoped operations
    // =========================================================================

    pub async fn init_in(&self, conn: &mut SqliteConnection) -> DbResult<()> {
        sqlx::query(T::CREATE_TABLE)
            .execute(&mut *conn)
            .await
            .map_err(DbError::initialization(T::CATEGORY.table_name()))?;

        info!(table = T::CATEGORY.table_name(), "Item table ensured");
        Ok(())
    }

    pub async fn create_in(
        &self,
        conn: &mut SqliteConnection,
        item: &Identified<T>,
    ) -> DbResult<String> {
        debug!(category = %T::CATEGORY, id = %item.id(), "Inserting item");

        let row = T::ROW_MAPPER.reverse_map(item)?;
        let mut query = sqlx::query(T::INSERT).bind(item.id());
        for value in T::columns(&row) {
            query = query.bind(value);
        }
        query
            .execute(&mut *conn)
            .await
            .map_err(DbError::store(format!("inserting {} {}", T::CATEGORY, item.id())))?;

        info!(category = %T::CATEGORY, id = %item.id(), "Item created");
        Ok(item.id().to_string())
    }

    pub async fn get_in(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<Identified<T>> {
        debug!(category = %T::CATEGORY, id = %id, "Fetching item");

        let row = sqlx::query_as::<_, T::Row>(T::SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::store(format!("fetching {} {}", T::CATEGORY, id)))?
            .ok_or_else(|| DbError::not_found(self.entity(), id))?;

        Ok(T::ROW_MAPPER.map(&row)?)
    }

    pub async fn get_all_in(&self, conn: &mut SqliteConnection) -> DbResult<Vec<Identified<T>>> {
        let rows = sqlx::query_as::<_, T::Row>(T::SELECT_ALL)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::store(format!("listing {}", T::CATEGORY.table_name())))?;

        debug!(category = %T::CATEGORY, count = rows.len(), "Fetched items");

        rows.iter()
            .map(|row| T::ROW_MAPPER.map(row).map_err(DbError::from))
            .collect()
    }

    pub async fn update_in(
        &self,
        conn: &mut SqliteConnection,
        item: &Identified<T>,
    ) -> DbResult<()> {
        debug!(category = %T::CATEGORY, id = %item.id(), "Updating item");

        let row = T::ROW_MAPPER.reverse_map(item)?;
        let mut query = sqlx::query(T::UPDATE);
        for value in T::columns(&row) {
            query = query.bind(value);
        }
        let result = query
            .bind(item.id())
            .execute(&mut *conn)
            .await
            .map_err(DbError::store(format!("updating {} {}", T::CATEGORY, item.id())))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(self.entity(), item.id()));
        }

        Ok(())
    }

    pub async fn delete_in(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
        debug!(category = %T::CATEGORY, id = %id, "Deleting item");

        let result = sqlx::query(T::DELETE)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(DbError::store(format!("deleting {} {}", T::CATEGORY, id)))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(self.entity(), id));
        }

        info!(category = %T::CATEGORY, id = %id, "Item deleted");
        Ok(())
    }

    /// Narrows an item of any category to this repository's type.
    ///
    /// ## Errors
    /// `InvalidItem` if the item belongs to another category.
    pub fn narrow(&self, item: &IdentifiableItem) -> DbResult<Identified<T>> {
        let value = T::from_item(item.value()).ok_or_else(|| {
            DbError::InvalidItem(format!(
                "{} repository cannot store a {} item",
                T::CATEGORY,
                item.category()
            ))
        })?;
        Ok(Identified::new(item.id(), value.clone()).map_err(MapError::from)?)
    }
}

// =============================================================================
// Category Dispatch
// =============================================================================

/// A category repository chosen at runtime.
#[derive(Debug, Clone)]
pub enum CategoryRepository {
    Cake(CakeRepository),
    Book(BookRepository),
    Toy(ToyRepository),
}

macro_rules! dispatch {
    ($self:expr, $repo:ident => $body:expr) => {
        match $self {
            CategoryRepository::Cake($repo) => $body,
            CategoryRepository::Book($repo) => $body,
            CategoryRepository::Toy($repo) => $body,
        }
    };
}

impl CategoryRepository {
    pub fn new(category: ItemCategory, pool: SqlitePool) -> Self {
        match category {
            ItemCategory::Cake => CategoryRepository::Cake(CakeRepository::new(pool)),
            ItemCategory::Book => CategoryRepository::Book(BookRepository::new(pool)),
            ItemCategory::Toy => CategoryRepository::Toy(ToyRepository::new(pool)),
        }
    }

    pub fn category(&self) -> ItemCategory {
        dispatch!(self, repo => repo.category())
    }

    pub async fn init(&self) -> DbResult<()> {
        dispatch!(self, repo => repo.init().await)
    }

    pub async fn create(&self, item: &IdentifiableItem) -> DbResult<String> {
        dispatch!(self, repo => repo.create(&repo.narrow(item)?).await)
    }

    pub async fn get(&self, id: &str) -> DbResult<IdentifiableItem> {
        dispatch!(self, repo => repo.get(id).await.map(|item| item.map(StoredItem::into_item)))
    }

    pub async fn get_all(&self) -> DbResult<Vec<IdentifiableItem>> {
        dispatch!(self, repo => widen_all(repo.get_all().await?))
    }

    pub async fn update(&self, item: &IdentifiableItem) -> DbResult<()> {
        dispatch!(self, repo => repo.update(&repo.narrow(item)?).await)
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        dispatch!(self, repo => repo.delete(id).await)
    }

    pub async fn create_in(
        &self,
        conn: &mut SqliteConnection,
        item: &IdentifiableItem,
    ) -> DbResult<String> {
        dispatch!(self, repo => repo.create_in(conn, &repo.narrow(item)?).await)
    }

    pub async fn get_in(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<IdentifiableItem> {
        dispatch!(self, repo => repo.get_in(conn, id).await.map(|item| item.map(StoredItem::into_item)))
    }

    pub async fn get_all_in(&self, conn: &mut SqliteConnection) -> DbResult<Vec<IdentifiableItem>> {
        dispatch!(self, repo => widen_all(repo.get_all_in(conn).await?))
    }

    pub async fn update_in(
        &self,
        conn: &mut SqliteConnection,
        item: &IdentifiableItem,
    ) -> DbResult<()> {
        dispatch!(self, repo => repo.update_in(conn, &repo.narrow(item)?).await)
    }

    pub async fn delete_in(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
        dispatch!(self, repo => repo.delete_in(conn, id).await)
    }
}

fn widen_all<T: StoredItem>(items: Vec<Identified<T>>) -> DbResult<Vec<IdentifiableItem>> {
    Ok(items
        .into_iter()
        .map(|item| item.map(StoredItem::into_item))
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use bazaar_core::builder::{BookBuilder, ToyBuilder};
    use bazaar_core::{Book, Toy};

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.cakes().init().await.unwrap();
        db.books().init().await.unwrap();
        db.toys().init().await.unwrap();
        db
    }

    fn book(title: &str) -> Book {
        BookBuilder::new()
            .title(title)
            .author("Frank Herbert")
            .genre("Science Fiction")
            .format("Hardcover")
            .language("English")
            .publisher("Chilton")
            .special_edition("No")
            .packaging("Box")
            .build()
            .unwrap()
    }

    fn toy() -> Toy {
        ToyBuilder::new()
            .kind("Puzzle")
            .age_group("6-8")
            .brand("Ravensburger")
            .material("Cardboard")
            .battery_required("No")
            .educational("Yes")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let db = setup().await;
        db.books().init().await.unwrap();
        db.books().init().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let db = setup().await;
        let books = db.books();

        let stored = Identified::new("book-1", book("Dune")).unwrap();
        let id = books.create(&stored).await.unwrap();
        assert_eq!(id, "book-1");

        let fetched = books.get(&id).await.unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_get_all_is_ordered_by_id() {
        let db = setup().await;
        let books = db.books();

        for (id, title) in [("b", "Emma"), ("c", "Ulysses"), ("a", "Dune")] {
            books
                .create(&Identified::new(id, book(title)).unwrap())
                .await
                .unwrap();
        }

        let ids: Vec<String> = books
            .get_all()
            .await
            .unwrap()
            .iter()
            .map(|book| book.id().to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_get_all_on_empty_table() {
        let db = setup().await;
        assert!(db.toys().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let db = setup().await;
        let toys = db.toys();

        assert!(toys.get("nope").await.unwrap_err().is_not_found());
        assert!(toys.delete("nope").await.unwrap_err().is_not_found());

        let ghost = Identified::new("nope", toy()).unwrap();
        assert!(toys.update(&ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = setup().await;
        let books = db.books();
        books
            .create(&Identified::new("book-1", book("Dune")).unwrap())
            .await
            .unwrap();

        let renamed = Identified::new("book-1", book("Dune Messiah")).unwrap();
        books.update(&renamed).await.unwrap();
        assert_eq!(books.get("book-1").await.unwrap().title(), "Dune Messiah");

        books.delete("book-1").await.unwrap();
        assert!(books.get("book-1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_store_error() {
        let db = setup().await;
        let toys = db.toys();
        let item = Identified::new("toy-1", toy()).unwrap();

        toys.create(&item).await.unwrap();
        assert!(matches!(
            toys.create(&item).await.unwrap_err(),
            DbError::Store { .. }
        ));
    }

    #[tokio::test]
    async fn test_category_repository_dispatch() {
        let db = setup().await;
        let repo = CategoryRepository::new(ItemCategory::Toy, db.pool().clone());
        assert_eq!(repo.category(), ItemCategory::Toy);

        let item = Identified::new("toy-1", Item::Toy(toy())).unwrap();
        repo.create(&item).await.unwrap();
        assert_eq!(repo.get("toy-1").await.unwrap(), item);
        assert_eq!(repo.get_all().await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn test_category_repository_rejects_other_category() {
        let db = setup().await;
        let repo = CategoryRepository::new(ItemCategory::Toy, db.pool().clone());

        let book = Identified::new("book-1", Item::Book(book("Dune"))).unwrap();
        assert!(matches!(
            repo.create(&book).await.unwrap_err(),
            DbError::InvalidItem(_)
        ));
        // Nothing reached the table
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_operations_before_init_fail_with_store_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.cakes().get_all().await.unwrap_err();
        assert!(matches!(err, DbError::Store { .. }));
    }
}
