//! Delimited (CSV) rows.
//!
//! Item rows hold the category's fields in canonical order. Order rows wrap
//! them: `[id, fields..., price, quantity]`, so a cake order row has 17
//! columns. Extra trailing columns are ignored.

use serde_json::Value;

use super::{require_category, require_columns, Format, Mapper};
use crate::builder::{build_item, OrderBuilder};
use crate::error::{BuildResult, MapResult};
use crate::types::{Item, ItemCategory, Order};

fn text(column: &str) -> Value {
    Value::String(column.to_string())
}

// =============================================================================
// Item Rows
// =============================================================================

/// Maps a row of item fields to an [`Item`] of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedItemMapper {
    category: ItemCategory,
}

impl DelimitedItemMapper {
    pub fn new(category: ItemCategory) -> Self {
        DelimitedItemMapper { category }
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    /// Number of leading columns this mapper reads.
    pub fn width(&self) -> usize {
        self.category.field_names().len()
    }

    /// Maps a borrowed row.
    pub fn map_columns(&self, row: &[String]) -> MapResult<Item> {
        require_columns(row, self.width())?;
        Ok(item_from_columns(self.category, row)?)
    }
}

impl Mapper for DelimitedItemMapper {
    type External = Vec<String>;
    type Domain = Item;

    fn format(&self) -> Format {
        Format::Delimited
    }

    fn map(&self, row: &Vec<String>) -> MapResult<Item> {
        self.map_columns(row)
    }

    fn reverse_map(&self, item: &Item) -> MapResult<Vec<String>> {
        require_category(Format::Delimited, self.category, item)?;
        Ok(item.field_values().into_iter().map(str::to_string).collect())
    }
}

/// Builds an item from the first `field_names().len()` columns of `columns`.
fn item_from_columns(category: ItemCategory, columns: &[String]) -> BuildResult<Item> {
    let names = category.field_names();
    build_item(category, |name| {
        names
            .iter()
            .position(|candidate| *candidate == name)
            .and_then(|index| columns.get(index))
            .map(|column| text(column))
    })
}

// =============================================================================
// Order Rows
// =============================================================================

/// Maps `[id, fields..., price, quantity]` rows to an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedOrderMapper {
    items: DelimitedItemMapper,
}

impl DelimitedOrderMapper {
    pub fn new(category: ItemCategory) -> Self {
        DelimitedOrderMapper {
            items: DelimitedItemMapper::new(category),
        }
    }

    pub fn category(&self) -> ItemCategory {
        self.items.category()
    }

    /// Minimum column count of an order row.
    pub fn width(&self) -> usize {
        self.items.width() + 3
    }

    /// Maps a borrowed row.
    pub fn map_columns(&self, row: &[String]) -> MapResult<Order> {
        require_columns(row, self.width())?;

        let fields = self.items.width();
        let item = item_from_columns(self.category(), &row[1..=fields])?;

        let order = OrderBuilder::new()
            .id(text(&row[0]))
            .item(item)
            .price(text(&row[fields + 1]))
            .quantity(text(&row[fields + 2]))
            .build()?;
        Ok(order)
    }
}

impl Mapper for DelimitedOrderMapper {
    type External = Vec<String>;
    type Domain = Order;

    fn format(&self) -> Format {
        Format::Delimited
    }

    fn map(&self, row: &Vec<String>) -> MapResult<Order> {
        self.map_columns(row)
    }

    fn reverse_map(&self, order: &Order) -> MapResult<Vec<String>> {
        let mut row = Vec::with_capacity(self.width());
        row.push(order.id().to_string());
        row.extend(self.items.reverse_map(order.item())?);
        row.push(order.price().to_string());
        row.push(order.quantity().to_string());
        Ok(row)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildError, MapError};

    fn columns(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn cake_order_row() -> Vec<String> {
        columns(&[
            "42", "Birthday", "Vanilla", "Strawberry", "Medium", "2", "Buttercream", "Vanilla",
            "Sprinkles", "Rainbow", "Happy", "Round", "None", "None", "Box", "30", "3",
        ])
    }

    #[test]
    fn test_maps_cake_order_row() {
        let order = DelimitedOrderMapper::new(ItemCategory::Cake)
            .map(&cake_order_row())
            .unwrap();

        assert_eq!(order.id(), "42");
        assert_eq!(order.price(), 30);
        assert_eq!(order.quantity(), 3);

        let cake = order.item().as_cake().unwrap();
        assert_eq!(cake.kind(), "Birthday");
        assert_eq!(cake.packaging_type(), "Box");
    }

    #[test]
    fn test_short_row_is_malformed_before_building() {
        let mapper = DelimitedOrderMapper::new(ItemCategory::Cake);
        assert_eq!(mapper.width(), 17);

        let err = mapper.map(&columns(&["42", "Birthday"])).unwrap_err();
        assert_eq!(
            err,
            MapError::malformed(Format::Delimited, "expected at least 17 columns, got 2")
        );
    }

    #[test]
    fn test_empty_column_is_rejected_by_builder() {
        let mut row = cake_order_row();
        row[2] = String::new();

        let err = DelimitedOrderMapper::new(ItemCategory::Cake)
            .map(&row)
            .unwrap_err();
        match err {
            MapError::Build(BuildError::MissingProperty { entity, problems }) => {
                assert_eq!(entity, "Cake");
                assert_eq!(problems.len(), 1);
                assert_eq!(problems[0].field(), "flavor");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_quantity_is_rejected() {
        let mut row = cake_order_row();
        row[16] = "three".to_string();

        let err = DelimitedOrderMapper::new(ItemCategory::Cake)
            .map(&row)
            .unwrap_err();
        assert!(matches!(err, MapError::Build(BuildError::IncorrectType { entity: "Order", .. })));
    }

    #[test]
    fn test_order_row_round_trip() {
        let mapper = DelimitedOrderMapper::new(ItemCategory::Cake);
        let row = cake_order_row();

        let order = mapper.map(&row).unwrap();
        assert_eq!(mapper.reverse_map(&order).unwrap(), row);
        assert_eq!(mapper.map(&mapper.reverse_map(&order).unwrap()).unwrap(), order);
    }

    #[test]
    fn test_item_row_round_trip_for_book() {
        let mapper = DelimitedItemMapper::new(ItemCategory::Book);
        let row = columns(&[
            "Dune",
            "Frank Herbert",
            "Science Fiction",
            "Hardcover",
            "English",
            "Chilton",
            "No",
            "Box",
        ]);

        let item = mapper.map(&row).unwrap();
        assert_eq!(item.as_book().unwrap().author(), "Frank Herbert");
        assert_eq!(mapper.reverse_map(&item).unwrap(), row);
    }

    #[test]
    fn test_reverse_rejects_other_category() {
        let books = DelimitedItemMapper::new(ItemCategory::Book);
        let toy = DelimitedItemMapper::new(ItemCategory::Toy)
            .map(&columns(&["Puzzle", "6-8", "Ravensburger", "Cardboard", "No", "Yes"]))
            .unwrap();

        let err = books.reverse_map(&toy).unwrap_err();
        assert!(matches!(err, MapError::Malformed { .. }));
    }
}
