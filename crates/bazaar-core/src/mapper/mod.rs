//! # Format Mappers
//!
//! Pure translation between external records and domain types.
//!
//! ## Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Format       External shape            Item      Order    Reverse     │
//! │   ──────────   ──────────────────────    ──────    ─────    ───────     │
//! │   Delimited    Vec<String> (CSV row)     yes       yes      yes         │
//! │   Structured   serde_json::Value         yes       yes      no          │
//! │   Markup       serde_json::Value         yes       yes      no          │
//! │   Relational   CakeRow/BookRow/ToyRow    yes       yes      yes         │
//! │                                                                         │
//! │   map():         external ──► builder ──► domain                        │
//! │   reverse_map(): domain ──► external                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mappers never enforce required fields themselves. They check the record's
//! shape (`MapError::Malformed`) and hand every value to a builder, whose
//! problems come back as `MapError::Build`.
//!
//! Text parsing is out of scope: CSV lines arrive already split, and JSON or
//! XML arrive already parsed into a [`serde_json::Value`] tree.

pub mod delimited;
pub mod document;
pub mod relational;

use serde_json::Value;
use std::fmt;

use crate::error::{MapError, MapResult};
use crate::types::{Item, ItemCategory, Order};

pub use delimited::{DelimitedItemMapper, DelimitedOrderMapper};
pub use document::{DocumentItemMapper, DocumentOrderMapper};
pub use relational::{
    BookRow, BookRowMapper, CakeRow, CakeRowMapper, OrderRow, OrderRowMapper, ResolvedOrderRow,
    ToyRow, ToyRowMapper,
};

// =============================================================================
// Format and Direction
// =============================================================================

/// External representation a mapper speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Ordered row of strings (CSV).
    Delimited,
    /// Key/value document (JSON).
    Structured,
    /// Key/value document from markup (XML), often with capitalized keys.
    Markup,
    /// Named-column database row.
    Relational,
}

impl Format {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Delimited => "delimited",
            Format::Structured => "structured",
            Format::Markup => "markup",
            Format::Relational => "relational",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way a mapping runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// External record to domain value.
    Forward,
    /// Domain value to external record.
    Reverse,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Reverse => f.write_str("reverse"),
        }
    }
}

// =============================================================================
// Mapper Trait
// =============================================================================

/// Translates one external record shape to one domain type.
///
/// `reverse_map` defaults to `NotImplemented`; reversible mappers override it.
pub trait Mapper {
    type External;
    type Domain;

    fn format(&self) -> Format;

    fn map(&self, external: &Self::External) -> MapResult<Self::Domain>;

    fn reverse_map(&self, _domain: &Self::Domain) -> MapResult<Self::External> {
        Err(MapError::NotImplemented {
            format: self.format(),
            direction: Direction::Reverse,
        })
    }
}

/// Fails with `Malformed` unless `row` has at least `expected` columns.
pub(crate) fn require_columns(row: &[String], expected: usize) -> MapResult<()> {
    if row.len() < expected {
        return Err(MapError::malformed(
            Format::Delimited,
            format!("expected at least {expected} columns, got {}", row.len()),
        ));
    }
    Ok(())
}

/// Fails with `Malformed` unless `item` belongs to `category`.
pub(crate) fn require_category(
    format: Format,
    category: ItemCategory,
    item: &Item,
) -> MapResult<()> {
    if item.category() != category {
        return Err(MapError::malformed(
            format,
            format!("expected a {category} item, got {}", item.category()),
        ));
    }
    Ok(())
}

// =============================================================================
// Record and Dispatching Mappers
// =============================================================================

/// An already-parsed external record of a non-relational format.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Row(Vec<String>),
    Document(Value),
}

impl Record {
    fn as_row(&self, format: Format) -> MapResult<&[String]> {
        match self {
            Record::Row(row) => Ok(row),
            Record::Document(_) => Err(MapError::malformed(format, "expected a row, got a document")),
        }
    }

    fn as_document(&self, format: Format) -> MapResult<&Value> {
        match self {
            Record::Document(document) => Ok(document),
            Record::Row(_) => Err(MapError::malformed(format, "expected a document, got a row")),
        }
    }
}

impl From<Vec<String>> for Record {
    fn from(row: Vec<String>) -> Self {
        Record::Row(row)
    }
}

impl From<Value> for Record {
    fn from(document: Value) -> Self {
        Record::Document(document)
    }
}

/// Item mapper chosen at runtime by [`MapperFactory`].
#[derive(Debug, Clone)]
pub enum ItemMapper {
    Delimited(DelimitedItemMapper),
    Document(DocumentItemMapper),
}

impl Mapper for ItemMapper {
    type External = Record;
    type Domain = Item;

    fn format(&self) -> Format {
        match self {
            ItemMapper::Delimited(mapper) => mapper.format(),
            ItemMapper::Document(mapper) => mapper.format(),
        }
    }

    fn map(&self, record: &Record) -> MapResult<Item> {
        match self {
            ItemMapper::Delimited(mapper) => mapper.map_columns(record.as_row(self.format())?),
            ItemMapper::Document(mapper) => mapper.map(record.as_document(self.format())?),
        }
    }

    fn reverse_map(&self, item: &Item) -> MapResult<Record> {
        match self {
            ItemMapper::Delimited(mapper) => mapper.reverse_map(item).map(Record::Row),
            ItemMapper::Document(mapper) => mapper.reverse_map(item).map(Record::Document),
        }
    }
}

/// Order mapper chosen at runtime by [`MapperFactory`].
#[derive(Debug, Clone)]
pub enum OrderMapper {
    Delimited(DelimitedOrderMapper),
    Document(DocumentOrderMapper),
}

impl Mapper for OrderMapper {
    type External = Record;
    type Domain = Order;

    fn format(&self) -> Format {
        match self {
            OrderMapper::Delimited(mapper) => mapper.format(),
            OrderMapper::Document(mapper) => mapper.format(),
        }
    }

    fn map(&self, record: &Record) -> MapResult<Order> {
        match self {
            OrderMapper::Delimited(mapper) => mapper.map_columns(record.as_row(self.format())?),
            OrderMapper::Document(mapper) => mapper.map(record.as_document(self.format())?),
        }
    }

    fn reverse_map(&self, order: &Order) -> MapResult<Record> {
        match self {
            OrderMapper::Delimited(mapper) => mapper.reverse_map(order).map(Record::Row),
            OrderMapper::Document(mapper) => mapper.reverse_map(order).map(Record::Document),
        }
    }
}

// =============================================================================
// Mapper Factory
// =============================================================================

/// Chooses a mapper by category and format.
///
/// Relational mappers need database rows and pre-resolved items, so they are
/// used directly by the repositories and never handed out here.
pub struct MapperFactory;

impl MapperFactory {
    pub fn item(category: ItemCategory, format: Format) -> MapResult<ItemMapper> {
        match format {
            Format::Delimited => Ok(ItemMapper::Delimited(DelimitedItemMapper::new(category))),
            Format::Structured => Ok(ItemMapper::Document(DocumentItemMapper::structured(category))),
            Format::Markup => Ok(ItemMapper::Document(DocumentItemMapper::markup(category))),
            Format::Relational => Err(MapError::UnsupportedMapper { category, format }),
        }
    }

    pub fn order(category: ItemCategory, format: Format) -> MapResult<OrderMapper> {
        match format {
            Format::Delimited => Ok(OrderMapper::Delimited(DelimitedOrderMapper::new(category))),
            Format::Structured => {
                Ok(OrderMapper::Document(DocumentOrderMapper::structured(category)))
            }
            Format::Markup => Ok(OrderMapper::Document(DocumentOrderMapper::markup(category))),
            Format::Relational => Err(MapError::UnsupportedMapper { category, format }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_factory_covers_every_category_and_document_format() {
        for category in ItemCategory::ALL {
            for format in [Format::Delimited, Format::Structured, Format::Markup] {
                assert_eq!(MapperFactory::item(category, format).unwrap().format(), format);
                assert_eq!(MapperFactory::order(category, format).unwrap().format(), format);
            }
        }
    }

    #[test]
    fn test_factory_rejects_relational() {
        let err = MapperFactory::item(ItemCategory::Book, Format::Relational).unwrap_err();
        assert_eq!(
            err,
            MapError::UnsupportedMapper {
                category: ItemCategory::Book,
                format: Format::Relational,
            }
        );
        assert_eq!(err.to_string(), "No relational mapper for category book");
    }

    #[test]
    fn test_record_shape_mismatch_is_malformed() {
        let mapper = MapperFactory::item(ItemCategory::Toy, Format::Delimited).unwrap();
        let err = mapper.map(&Record::Document(json!({}))).unwrap_err();
        assert!(matches!(err, MapError::Malformed { format: Format::Delimited, .. }));
    }

    #[test]
    fn test_delimited_order_through_factory() {
        let mapper = MapperFactory::order(ItemCategory::Cake, Format::Delimited).unwrap();
        let record = Record::Row(columns(&[
            "42", "Birthday", "Vanilla", "Strawberry", "Medium", "2", "Buttercream", "Vanilla",
            "Sprinkles", "Rainbow", "Happy", "Round", "None", "None", "Box", "30", "3",
        ]));

        let order = mapper.map(&record).unwrap();
        assert_eq!(order.price(), 30);
        assert_eq!(order.quantity(), 3);
        assert_eq!(order.item().as_cake().unwrap().kind(), "Birthday");
        assert_eq!(mapper.reverse_map(&order).unwrap(), record);
    }

    #[test]
    fn test_document_reverse_is_not_implemented() {
        let mapper = MapperFactory::item(ItemCategory::Toy, Format::Markup).unwrap();
        let toy = mapper
            .map(&Record::Document(json!({
                "Type": "Puzzle",
                "AgeGroup": "6-8",
                "Brand": "Ravensburger",
                "Material": "Cardboard",
                "BatteryRequired": "No",
                "Educational": "Yes",
            })))
            .unwrap();

        let err = mapper.reverse_map(&toy).unwrap_err();
        assert_eq!(
            err,
            MapError::NotImplemented {
                format: Format::Markup,
                direction: Direction::Reverse,
            }
        );
    }
}
