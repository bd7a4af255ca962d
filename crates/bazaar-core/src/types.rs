//! # Domain Types
//!
//! Core domain types used throughout Bazaar.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                │
//! │  │    Cake      │   │    Book      │   │     Toy      │                │
//! │  │  14 fields   │   │   8 fields   │   │   6 fields   │                │
//! │  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘                │
//! │         └──────────────────┼──────────────────┘                        │
//! │                            ▼                                            │
//! │                   ┌─────────────────┐                                   │
//! │                   │ Item (sum type) │ ── category(): cake|book|toy      │
//! │                   └────────┬────────┘                                   │
//! │                            │ wrapped by                                 │
//! │                            ▼                                            │
//! │                   ┌─────────────────┐      ┌────────────────────────┐  │
//! │                   │ Identified<T>   │      │ Order<I = Item>        │  │
//! │                   │  id + value     │◄─────│  id, item, price, qty  │  │
//! │                   └─────────────────┘      └────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Construction
//! Items and orders have no public constructors. They are produced by the
//! builders in [`crate::builder`], which validate every field, so a value of
//! these types is always well-formed.
//!
//! Types serialize to camelCase JSON. They do not implement `Deserialize`;
//! inbound data goes through a mapper and a builder.

use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, ValidationError};

// =============================================================================
// Item Category
// =============================================================================

/// The closed set of item categories.
///
/// Adding a category means touching this enum and every exhaustive `match`
/// over it; the compiler lists them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Cake,
    Book,
    Toy,
}

impl ItemCategory {
    /// Every category, in declaration order.
    pub const ALL: [ItemCategory; 3] = [ItemCategory::Cake, ItemCategory::Book, ItemCategory::Toy];

    /// The persisted tag (`orders.item_category`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Cake => "cake",
            ItemCategory::Book => "book",
            ItemCategory::Toy => "toy",
        }
    }

    /// Name of the table holding this category's items.
    pub const fn table_name(&self) -> &'static str {
        match self {
            ItemCategory::Cake => "cakes",
            ItemCategory::Book => "books",
            ItemCategory::Toy => "toys",
        }
    }

    /// Human-readable entity name used in error messages.
    pub const fn entity_name(&self) -> &'static str {
        match self {
            ItemCategory::Cake => "Cake",
            ItemCategory::Book => "Book",
            ItemCategory::Toy => "Toy",
        }
    }

    /// Canonical (camelCase) field names, in declaration order.
    pub const fn field_names(&self) -> &'static [&'static str] {
        match self {
            ItemCategory::Cake => Cake::FIELDS,
            ItemCategory::Book => Book::FIELDS,
            ItemCategory::Toy => Toy::FIELDS,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cake" => Ok(ItemCategory::Cake),
            "book" => Ok(ItemCategory::Book),
            "toy" => Ok(ItemCategory::Toy),
            other => Err(CoreError::UnsupportedCategory(other.to_string())),
        }
    }
}

// =============================================================================
// Cake
// =============================================================================

/// A made-to-order cake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cake {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) flavor: String,
    pub(crate) filling: String,
    pub(crate) size: String,
    pub(crate) layers: String,
    pub(crate) frosting_type: String,
    pub(crate) frosting_flavor: String,
    pub(crate) decoration_type: String,
    pub(crate) decoration_color: String,
    pub(crate) custom_message: String,
    pub(crate) shape: String,
    pub(crate) allergies: String,
    pub(crate) special_ingredients: String,
    pub(crate) packaging_type: String,
}

impl Cake {
    pub const FIELDS: &'static [&'static str] = &[
        "type",
        "flavor",
        "filling",
        "size",
        "layers",
        "frostingType",
        "frostingFlavor",
        "decorationType",
        "decorationColor",
        "customMessage",
        "shape",
        "allergies",
        "specialIngredients",
        "packagingType",
    ];

    /// The cake type ("Birthday", "Wedding", ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }
    pub fn flavor(&self) -> &str {
        &self.flavor
    }
    pub fn filling(&self) -> &str {
        &self.filling
    }
    pub fn size(&self) -> &str {
        &self.size
    }
    pub fn layers(&self) -> &str {
        &self.layers
    }
    pub fn frosting_type(&self) -> &str {
        &self.frosting_type
    }
    pub fn frosting_flavor(&self) -> &str {
        &self.frosting_flavor
    }
    pub fn decoration_type(&self) -> &str {
        &self.decoration_type
    }
    pub fn decoration_color(&self) -> &str {
        &self.decoration_color
    }
    pub fn custom_message(&self) -> &str {
        &self.custom_message
    }
    pub fn shape(&self) -> &str {
        &self.shape
    }
    pub fn allergies(&self) -> &str {
        &self.allergies
    }
    pub fn special_ingredients(&self) -> &str {
        &self.special_ingredients
    }
    pub fn packaging_type(&self) -> &str {
        &self.packaging_type
    }

    /// Field values in [`Cake::FIELDS`] order.
    pub fn field_values(&self) -> Vec<&str> {
        vec![
            self.kind.as_str(),
            self.flavor.as_str(),
            self.filling.as_str(),
            self.size.as_str(),
            self.layers.as_str(),
            self.frosting_type.as_str(),
            self.frosting_flavor.as_str(),
            self.decoration_type.as_str(),
            self.decoration_color.as_str(),
            self.custom_message.as_str(),
            self.shape.as_str(),
            self.allergies.as_str(),
            self.special_ingredients.as_str(),
            self.packaging_type.as_str(),
        ]
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book, possibly a special edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) genre: String,
    pub(crate) format: String,
    pub(crate) language: String,
    pub(crate) publisher: String,
    pub(crate) special_edition: String,
    pub(crate) packaging: String,
}

impl Book {
    pub const FIELDS: &'static [&'static str] = &[
        "title",
        "author",
        "genre",
        "format",
        "language",
        "publisher",
        "specialEdition",
        "packaging",
    ];

    pub fn title(&self) -> &str {
        &self.title
    }
    pub fn author(&self) -> &str {
        &self.author
    }
    pub fn genre(&self) -> &str {
        &self.genre
    }
    /// Physical format ("Hardcover", "Paperback", ...).
    pub fn format(&self) -> &str {
        &self.format
    }
    pub fn language(&self) -> &str {
        &self.language
    }
    pub fn publisher(&self) -> &str {
        &self.publisher
    }
    pub fn special_edition(&self) -> &str {
        &self.special_edition
    }
    pub fn packaging(&self) -> &str {
        &self.packaging
    }

    /// Field values in [`Book::FIELDS`] order.
    pub fn field_values(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.author.as_str(),
            self.genre.as_str(),
            self.format.as_str(),
            self.language.as_str(),
            self.publisher.as_str(),
            self.special_edition.as_str(),
            self.packaging.as_str(),
        ]
    }
}

// =============================================================================
// Toy
// =============================================================================

/// A toy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toy {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) age_group: String,
    pub(crate) brand: String,
    pub(crate) material: String,
    pub(crate) battery_required: String,
    pub(crate) educational: String,
}

impl Toy {
    pub const FIELDS: &'static [&'static str] = &[
        "type",
        "ageGroup",
        "brand",
        "material",
        "batteryRequired",
        "educational",
    ];

    /// The toy type ("Puzzle", "Plush", ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }
    pub fn age_group(&self) -> &str {
        &self.age_group
    }
    pub fn brand(&self) -> &str {
        &self.brand
    }
    pub fn material(&self) -> &str {
        &self.material
    }
    pub fn battery_required(&self) -> &str {
        &self.battery_required
    }
    pub fn educational(&self) -> &str {
        &self.educational
    }

    /// Field values in [`Toy::FIELDS`] order.
    pub fn field_values(&self) -> Vec<&str> {
        vec![
            self.kind.as_str(),
            self.age_group.as_str(),
            self.brand.as_str(),
            self.material.as_str(),
            self.battery_required.as_str(),
            self.educational.as_str(),
        ]
    }
}

// =============================================================================
// Item
// =============================================================================

/// Any orderable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Item {
    Cake(Cake),
    Book(Book),
    Toy(Toy),
}

impl Item {
    /// The runtime category of this item.
    pub fn category(&self) -> ItemCategory {
        match self {
            Item::Cake(_) => ItemCategory::Cake,
            Item::Book(_) => ItemCategory::Book,
            Item::Toy(_) => ItemCategory::Toy,
        }
    }

    /// Field values in [`ItemCategory::field_names`] order.
    pub fn field_values(&self) -> Vec<&str> {
        match self {
            Item::Cake(cake) => cake.field_values(),
            Item::Book(book) => book.field_values(),
            Item::Toy(toy) => toy.field_values(),
        }
    }

    pub fn as_cake(&self) -> Option<&Cake> {
        match self {
            Item::Cake(cake) => Some(cake),
            _ => None,
        }
    }

    pub fn as_book(&self) -> Option<&Book> {
        match self {
            Item::Book(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_toy(&self) -> Option<&Toy> {
        match self {
            Item::Toy(toy) => Some(toy),
            _ => None,
        }
    }
}

impl From<Cake> for Item {
    fn from(cake: Cake) -> Self {
        Item::Cake(cake)
    }
}

impl From<Book> for Item {
    fn from(book: Book) -> Self {
        Item::Book(book)
    }
}

impl From<Toy> for Item {
    fn from(toy: Toy) -> Self {
        Item::Toy(toy)
    }
}

// =============================================================================
// Identified
// =============================================================================

/// A value paired with its persistent identifier.
///
/// Composition rather than a separate shape: an identified cake is a cake
/// plus an id, and derefs to the cake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identified<T> {
    id: String,
    #[serde(flatten)]
    value: T,
}

/// An item with a persistent id.
pub type IdentifiableItem = Identified<Item>;
pub type IdentifiableCake = Identified<Cake>;
pub type IdentifiableBook = Identified<Book>;
pub type IdentifiableToy = Identified<Toy>;

impl<T> Identified<T> {
    /// Attaches `id` to a fully built value.
    ///
    /// ## Errors
    /// `ValidationError::Required` if `id` is empty or whitespace.
    pub fn new(id: impl Into<String>, value: T) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::required("id"));
        }
        Ok(Identified { id, value })
    }

    /// Attaches a freshly generated UUID.
    pub fn generate(value: T) -> Self {
        Identified {
            id: generate_id(),
            value,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (String, T) {
        (self.id, self.value)
    }

    /// Converts the wrapped value, keeping the id.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Identified<U> {
        Identified {
            id: self.id,
            value: f(self.value),
        }
    }
}

impl<T> Deref for Identified<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl IdentifiableItem {
    pub fn category(&self) -> ItemCategory {
        self.value.category()
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order for one item.
///
/// `I` is [`Item`] for transient orders and [`IdentifiableItem`] once the
/// item has (or is about to get) a persistent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order<I = Item> {
    pub(crate) id: String,
    pub(crate) item: I,
    pub(crate) price: i64,
    pub(crate) quantity: i64,
}

/// An order whose item carries a persistent id.
pub type IdentifiableOrder = Order<IdentifiableItem>;

impl<I> Order<I> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn item(&self) -> &I {
        &self.item
    }

    /// Price in whole currency units (never negative).
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Quantity ordered (always positive).
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn into_item(self) -> I {
        self.item
    }
}

impl Order<Item> {
    /// Turns a built order into an identifiable one by giving its item an id.
    pub fn identify(self, item_id: impl Into<String>) -> Result<IdentifiableOrder, ValidationError> {
        let item = Identified::new(item_id, self.item)?;
        Ok(Order {
            id: self.id,
            item,
            price: self.price,
            quantity: self.quantity,
        })
    }

    pub fn category(&self) -> ItemCategory {
        self.item.category()
    }
}

impl IdentifiableOrder {
    pub fn category(&self) -> ItemCategory {
        self.item.category()
    }

    pub fn item_id(&self) -> &str {
        self.item.id()
    }

    /// Drops the item id, yielding the plain order.
    pub fn into_order(self) -> Order {
        Order {
            id: self.id,
            item: self.item.into_value(),
            price: self.price,
            quantity: self.quantity,
        }
    }
}

/// Generates a new entity ID.
///
/// ## Usage
/// ```rust
/// let id = bazaar_core::generate_id();
/// assert_eq!(id.len(), 36);
/// ```
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{OrderBuilder, ToyBuilder};

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

    #[test]
    fn test_category_round_trips_through_its_tag() {
        for category in ItemCategory::ALL {
            let parsed: ItemCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!(" CAKE ".parse::<ItemCategory>().unwrap(), ItemCategory::Cake);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = "furniture".parse::<ItemCategory>().unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedCategory(ref tag) if tag == "furniture"));
        assert_eq!(err.to_string(), "Unsupported item category: furniture");
    }

    #[test]
    fn test_field_names_match_field_values() {
        assert_eq!(ItemCategory::Cake.field_names().len(), 14);
        assert_eq!(ItemCategory::Book.field_names().len(), 8);
        assert_eq!(ItemCategory::Toy.field_names().len(), 6);

        let item = Item::Toy(toy());
        assert_eq!(item.field_values().len(), item.category().field_names().len());
        assert_eq!(item.field_values()[0], "Puzzle");
    }

    #[test]
    fn test_identified_requires_an_id() {
        assert_eq!(
            Identified::new("", toy()).unwrap_err(),
            ValidationError::required("id")
        );
        assert!(Identified::new("   ", toy()).is_err());

        let identified = Identified::new("toy-1", toy()).unwrap();
        assert_eq!(identified.id(), "toy-1");
        // Deref exposes the wrapped toy's getters
        assert_eq!(identified.brand(), "Ravensburger");
    }

    #[test]
    fn test_identified_map_keeps_id() {
        let item = Identified::new("toy-1", toy()).unwrap().map(Item::Toy);
        assert_eq!(item.id(), "toy-1");
        assert_eq!(item.category(), ItemCategory::Toy);
    }

    #[test]
    fn test_order_identify() {
        let order = OrderBuilder::new()
            .id("order-1")
            .item(Item::Toy(toy()))
            .price(12)
            .quantity(2)
            .build()
            .unwrap();

        assert!(order.clone().identify("").is_err());

        let identified = order.identify("toy-9").unwrap();
        assert_eq!(identified.item_id(), "toy-9");
        assert_eq!(identified.category(), ItemCategory::Toy);
        assert_eq!(identified.into_order().price(), 12);
    }

    #[test]
    fn test_item_serializes_with_category_tag() {
        let json = serde_json::to_value(Identified::new("toy-1", Item::Toy(toy())).unwrap()).unwrap();
        assert_eq!(json["id"], "toy-1");
        assert_eq!(json["category"], "toy");
        assert_eq!(json["type"], "Puzzle");
        assert_eq!(json["ageGroup"], "6-8");
    }

    #[test]
    fn test_generate_id_is_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
