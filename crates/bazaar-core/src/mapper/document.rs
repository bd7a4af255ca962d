//! Key/value documents (JSON, and XML parsed into the same tree).
//!
//! Keys are matched through [`normalize_key`], so `FrostingType`,
//! `frostingType` and `frosting_type` all address the same field. Missing
//! or null fields become empty strings and the builder rejects them.
//! Scalars are stringified; arrays and objects are passed through untouched
//! so the builder reports an incorrect type.

use serde_json::{Map, Value};
use std::collections::HashMap;

use super::{Format, Mapper};
use crate::builder::{build_item, OrderBuilder};
use crate::error::{MapError, MapResult};
use crate::types::{Item, ItemCategory, Order};
use crate::validation::{normalize_key, value_kind};

// =============================================================================
// Key Lookup
// =============================================================================

/// Normalized view over a document object.
struct Fields<'a> {
    by_key: HashMap<String, &'a Value>,
}

impl<'a> Fields<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        let by_key = object
            .iter()
            .map(|(key, value)| (normalize_key(key), value))
            .collect();
        Fields { by_key }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.by_key.get(&normalize_key(name)).copied()
    }

    /// First present, non-null value among `names`.
    fn first(&self, names: &[&str]) -> Option<&'a Value> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|value| !value.is_null())
    }

    /// Field value as handed to an item builder.
    fn item_field(&self, name: &str) -> Value {
        match self.get(name) {
            None | Some(Value::Null) => Value::String(String::new()),
            Some(value) => stringify(value),
        }
    }
}

fn stringify(value: &Value) -> Value {
    match value {
        Value::String(_) | Value::Array(_) | Value::Object(_) => value.clone(),
        Value::Bool(flag) => Value::String(flag.to_string()),
        Value::Number(number) => Value::String(number.to_string()),
        Value::Null => Value::String(String::new()),
    }
}

fn require_object(format: Format, document: &Value) -> MapResult<&Map<String, Value>> {
    document.as_object().ok_or_else(|| {
        MapError::malformed(
            format,
            format!("expected an object, got {}", value_kind(document)),
        )
    })
}

fn item_from_fields(category: ItemCategory, fields: &Fields<'_>) -> MapResult<Item> {
    Ok(build_item(category, |name| Some(fields.item_field(name)))?)
}

// =============================================================================
// Item Documents
// =============================================================================

/// Maps a document to an [`Item`] of one category. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentItemMapper {
    category: ItemCategory,
    format: Format,
}

impl DocumentItemMapper {
    /// Mapper for JSON-style documents.
    pub fn structured(category: ItemCategory) -> Self {
        DocumentItemMapper {
            category,
            format: Format::Structured,
        }
    }

    /// Mapper for documents parsed from markup.
    pub fn markup(category: ItemCategory) -> Self {
        DocumentItemMapper {
            category,
            format: Format::Markup,
        }
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }
}

impl Mapper for DocumentItemMapper {
    type External = Value;
    type Domain = Item;

    fn format(&self) -> Format {
        self.format
    }

    fn map(&self, document: &Value) -> MapResult<Item> {
        let object = require_object(self.format, document)?;
        item_from_fields(self.category, &Fields::new(object))
    }
}

// =============================================================================
// Order Documents
// =============================================================================

/// Maps an order document to an [`Order`]. Read-only.
///
/// The item may be nested under `item` or spread flat over the envelope.
/// Markup documents name the id `OrderID`; `id` is accepted as a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOrderMapper {
    items: DocumentItemMapper,
}

impl DocumentOrderMapper {
    pub fn structured(category: ItemCategory) -> Self {
        DocumentOrderMapper {
            items: DocumentItemMapper::structured(category),
        }
    }

    pub fn markup(category: ItemCategory) -> Self {
        DocumentOrderMapper {
            items: DocumentItemMapper::markup(category),
        }
    }

    pub fn category(&self) -> ItemCategory {
        self.items.category()
    }

    fn id_keys(&self) -> &'static [&'static str] {
        match self.items.format {
            Format::Markup => &["orderId", "id"],
            _ => &["id"],
        }
    }
}

impl Mapper for DocumentOrderMapper {
    type External = Value;
    type Domain = Order;

    fn format(&self) -> Format {
        self.items.format
    }

    fn map(&self, document: &Value) -> MapResult<Order> {
        let format = self.format();
        let envelope = Fields::new(require_object(format, document)?);

        let item = match envelope.get("item") {
            Some(Value::Object(nested)) => item_from_fields(self.category(), &Fields::new(nested))?,
            Some(other) if !other.is_null() => {
                return Err(MapError::malformed(
                    format,
                    format!("item must be an object, got {}", value_kind(other)),
                ));
            }
            _ => item_from_fields(self.category(), &envelope)?,
        };

        let mut builder = OrderBuilder::new().item(item);
        if let Some(id) = envelope.first(self.id_keys()) {
            builder = builder.id(stringify(id));
        }
        if let Some(price) = envelope.get("price") {
            builder = builder.price(price.clone());
        }
        if let Some(quantity) = envelope.get("quantity") {
            builder = builder.quantity(quantity.clone());
        }

        Ok(builder.build()?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::mapper::Direction;
    use serde_json::json;

    fn book_fields() -> Value {
        json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science Fiction",
            "format": "Hardcover",
            "language": "English",
            "publisher": "Chilton",
            "specialEdition": "No",
            "packaging": "Box",
        })
    }

    #[test]
    fn test_nested_structured_order() {
        let document = json!({
            "id": 7,
            "item": book_fields(),
            "price": 25,
            "quantity": 2,
        });

        let order = DocumentOrderMapper::structured(ItemCategory::Book)
            .map(&document)
            .unwrap();
        assert_eq!(order.id(), "7");
        assert_eq!(order.price(), 25);
        assert_eq!(order.quantity(), 2);
        assert_eq!(order.item().as_book().unwrap().title(), "Dune");
    }

    #[test]
    fn test_flat_structured_order() {
        let mut document = book_fields();
        document["id"] = json!("order-1");
        document["price"] = json!("25");
        document["quantity"] = json!(1);

        let order = DocumentOrderMapper::structured(ItemCategory::Book)
            .map(&document)
            .unwrap();
        assert_eq!(order.id(), "order-1");
        assert_eq!(order.price(), 25);
        assert_eq!(order.item().as_book().unwrap().publisher(), "Chilton");
    }

    #[test]
    fn test_markup_order_with_capitalized_keys() {
        let document = json!({
            "OrderID": "2001",
            "Type": "Puzzle",
            "AgeGroup": "6-8",
            "Brand": "Ravensburger",
            "Material": "Cardboard",
            "BatteryRequired": "No",
            "Educational": "Yes",
            "Price": "15",
            "Quantity": "4",
        });

        let order = DocumentOrderMapper::markup(ItemCategory::Toy)
            .map(&document)
            .unwrap();
        assert_eq!(order.id(), "2001");
        assert_eq!(order.quantity(), 4);
        assert_eq!(order.item().as_toy().unwrap().age_group(), "6-8");
    }

    #[test]
    fn test_markup_order_falls_back_to_lowercase_id() {
        let document = json!({
            "id": "2002",
            "type": "Plush",
            "agegroup": "3+",
            "brand": "Jellycat",
            "material": "Polyester",
            "batteryrequired": false,
            "educational": false,
            "price": 20,
            "quantity": 1,
        });

        let order = DocumentOrderMapper::markup(ItemCategory::Toy)
            .map(&document)
            .unwrap();
        assert_eq!(order.id(), "2002");
        // Booleans are stringified on the way into the builder
        assert_eq!(order.item().as_toy().unwrap().battery_required(), "false");
    }

    #[test]
    fn test_missing_field_is_missing_property() {
        let mut fields = book_fields();
        fields["author"] = Value::Null;

        let err = DocumentItemMapper::structured(ItemCategory::Book)
            .map(&fields)
            .unwrap_err();
        match err {
            MapError::Build(err) => {
                assert_eq!(err.to_string(), "Missing required property for Book");
                assert!(err.mentions("author"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nested_array_is_incorrect_type() {
        let mut fields = book_fields();
        fields["genre"] = json!(["Science Fiction", "Classic"]);

        let err = DocumentItemMapper::structured(ItemCategory::Book)
            .map(&fields)
            .unwrap_err();
        assert!(matches!(err, MapError::Build(BuildError::IncorrectType { entity: "Book", .. })));
    }

    #[test]
    fn test_non_object_is_malformed() {
        let mapper = DocumentItemMapper::structured(ItemCategory::Cake);
        for document in [json!(null), json!("cake"), json!([1, 2])] {
            assert!(matches!(
                mapper.map(&document),
                Err(MapError::Malformed { format: Format::Structured, .. })
            ));
        }

        let err = DocumentOrderMapper::structured(ItemCategory::Book)
            .map(&json!({ "id": "1", "item": "Dune", "price": 1, "quantity": 1 }))
            .unwrap_err();
        assert!(matches!(err, MapError::Malformed { .. }));
    }

    #[test]
    fn test_reverse_is_not_implemented() {
        let mapper = DocumentItemMapper::structured(ItemCategory::Book);
        let book = mapper.map(&book_fields()).unwrap();

        assert_eq!(
            mapper.reverse_map(&book).unwrap_err(),
            MapError::NotImplemented {
                format: Format::Structured,
                direction: Direction::Reverse,
            }
        );
    }
}
