//! Relational rows.
//!
//! One row type per table. Columns are snake_case; the `type` column is
//! exposed as `kind`. With the `sqlx` feature the rows derive
//! [`sqlx::FromRow`] so `bazaar-db` can query straight into them.
//!
//! ## Tables
//! ```text
//! ┌───────────────┐        ┌──────────────────────────────┐
//! │ cakes / books │        │ orders                       │
//! │ / toys        │        │                              │
//! │               │        │ id            TEXT PK        │
//! │ id  TEXT PK ◄─┼────────┤ item_id       TEXT           │
//! │ ...fields     │        │ item_category TEXT           │
//! │               │        │ price         INTEGER        │
//! └───────────────┘        │ quantity      INTEGER        │
//!                          └──────────────────────────────┘
//! ```
//!
//! The `item_id` reference is logical only. The order mapper is handed the
//! already resolved item and checks that it is the one the row points at.

use super::{Format, Mapper};
use crate::builder::{BookBuilder, CakeBuilder, OrderBuilder, ToyBuilder};
use crate::error::{CoreError, MapError, MapResult};
use crate::types::{Book, Cake, IdentifiableItem, IdentifiableOrder, Identified, ItemCategory, Toy};

// =============================================================================
// Item Rows
// =============================================================================

/// A row of the `cakes` table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CakeRow {
    pub id: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub kind: String,
    pub flavor: String,
    pub filling: String,
    pub size: String,
    pub layers: String,
    pub frosting_type: String,
    pub frosting_flavor: String,
    pub decoration_type: String,
    pub decoration_color: String,
    pub custom_message: String,
    pub shape: String,
    pub allergies: String,
    pub special_ingredients: String,
    pub packaging_type: String,
}

/// A row of the `books` table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub format: String,
    pub language: String,
    pub publisher: String,
    pub special_edition: String,
    pub packaging: String,
}

/// A row of the `toys` table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ToyRow {
    pub id: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub kind: String,
    pub age_group: String,
    pub brand: String,
    pub material: String,
    pub battery_required: String,
    pub educational: String,
}

macro_rules! row_mapper {
    (
        $(#[$meta:meta])*
        $mapper:ident : $row:ident <=> $item:ident via $builder:ident {
            $( $field:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $mapper;

        impl Mapper for $mapper {
            type External = $row;
            type Domain = Identified<$item>;

            fn format(&self) -> Format {
                Format::Relational
            }

            fn map(&self, row: &$row) -> MapResult<Identified<$item>> {
                let item = $builder::new()
                    $( .$field(row.$field.as_str()) )+
                    .build()?;
                Ok(Identified::new(row.id.as_str(), item)?)
            }

            fn reverse_map(&self, item: &Identified<$item>) -> MapResult<$row> {
                Ok($row {
                    id: item.id().to_string(),
                    $( $field: item.$field.clone(), )+
                })
            }
        }
    };
}

row_mapper! {
    /// [`CakeRow`] <-> [`Identified<Cake>`](crate::types::IdentifiableCake).
    CakeRowMapper: CakeRow <=> Cake via CakeBuilder {
        kind,
        flavor,
        filling,
        size,
        layers,
        frosting_type,
        frosting_flavor,
        decoration_type,
        decoration_color,
        custom_message,
        shape,
        allergies,
        special_ingredients,
        packaging_type,
    }
}

row_mapper! {
    /// [`BookRow`] <-> [`Identified<Book>`](crate::types::IdentifiableBook).
    BookRowMapper: BookRow <=> Book via BookBuilder {
        title,
        author,
        genre,
        format,
        language,
        publisher,
        special_edition,
        packaging,
    }
}

row_mapper! {
    /// [`ToyRow`] <-> [`Identified<Toy>`](crate::types::IdentifiableToy).
    ToyRowMapper: ToyRow <=> Toy via ToyBuilder {
        kind,
        age_group,
        brand,
        material,
        battery_required,
        educational,
    }
}

// =============================================================================
// Order Rows
// =============================================================================

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderRow {
    pub id: String,
    pub quantity: i64,
    pub price: i64,
    pub item_category: String,
    pub item_id: String,
}

impl OrderRow {
    /// Parses the stored category tag.
    pub fn category(&self) -> Result<ItemCategory, CoreError> {
        self.item_category.parse()
    }
}

/// An order row together with the item it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrderRow {
    pub row: OrderRow,
    pub item: IdentifiableItem,
}

/// [`ResolvedOrderRow`] <-> [`IdentifiableOrder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderRowMapper;

impl Mapper for OrderRowMapper {
    type External = ResolvedOrderRow;
    type Domain = IdentifiableOrder;

    fn format(&self) -> Format {
        Format::Relational
    }

    fn map(&self, resolved: &ResolvedOrderRow) -> MapResult<IdentifiableOrder> {
        let ResolvedOrderRow { row, item } = resolved;

        let references_item = row.category().ok() == Some(item.category()) && row.item_id == item.id();
        if !references_item {
            return Err(MapError::malformed(
                Format::Relational,
                format!(
                    "order {} references {}/{} but was resolved to {}/{}",
                    row.id,
                    row.item_category,
                    row.item_id,
                    item.category(),
                    item.id()
                ),
            ));
        }

        let order = OrderBuilder::new()
            .id(row.id.as_str())
            .item(item.clone())
            .price(row.price)
            .quantity(row.quantity)
            .build()?;
        Ok(order)
    }

    fn reverse_map(&self, order: &IdentifiableOrder) -> MapResult<ResolvedOrderRow> {
        Ok(ResolvedOrderRow {
            row: OrderRow {
                id: order.id().to_string(),
                quantity: order.quantity(),
                price: order.price(),
                item_category: order.category().as_str().to_string(),
                item_id: order.item_id().to_string(),
            },
            item: order.item().clone(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::Item;

    fn toy_row() -> ToyRow {
        ToyRow {
            id: "toy-1".to_string(),
            kind: "Puzzle".to_string(),
            age_group: "6-8".to_string(),
            brand: "Ravensburger".to_string(),
            material: "Cardboard".to_string(),
            battery_required: "No".to_string(),
            educational: "Yes".to_string(),
        }
    }

    fn order_row() -> OrderRow {
        OrderRow {
            id: "order-1".to_string(),
            quantity: 2,
            price: 15,
            item_category: "toy".to_string(),
            item_id: "toy-1".to_string(),
        }
    }

    #[test]
    fn test_toy_row_round_trip() {
        let toy = ToyRowMapper.map(&toy_row()).unwrap();
        assert_eq!(toy.id(), "toy-1");
        assert_eq!(toy.kind(), "Puzzle");
        assert_eq!(ToyRowMapper.reverse_map(&toy).unwrap(), toy_row());
    }

    #[test]
    fn test_row_with_empty_column_is_rejected() {
        let mut row = toy_row();
        row.brand = String::new();
        assert!(matches!(ToyRowMapper.map(&row), Err(MapError::Build(_))));

        let mut row = toy_row();
        row.id = String::new();
        assert_eq!(
            ToyRowMapper.map(&row).unwrap_err(),
            MapError::Validation(ValidationError::required("id"))
        );
    }

    #[test]
    fn test_order_row_round_trip() {
        let item = ToyRowMapper.map(&toy_row()).unwrap().map(Item::Toy);
        let resolved = ResolvedOrderRow {
            row: order_row(),
            item,
        };

        let order = OrderRowMapper.map(&resolved).unwrap();
        assert_eq!(order.id(), "order-1");
        assert_eq!(order.item_id(), "toy-1");
        assert_eq!(order.price(), 15);
        assert_eq!(OrderRowMapper.reverse_map(&order).unwrap(), resolved);
    }

    #[test]
    fn test_order_row_must_reference_resolved_item() {
        let item = ToyRowMapper.map(&toy_row()).unwrap().map(Item::Toy);

        let mut row = order_row();
        row.item_id = "toy-2".to_string();
        let err = OrderRowMapper
            .map(&ResolvedOrderRow { row, item: item.clone() })
            .unwrap_err();
        assert!(matches!(err, MapError::Malformed { format: Format::Relational, .. }));

        let mut row = order_row();
        row.item_category = "cake".to_string();
        assert!(OrderRowMapper.map(&ResolvedOrderRow { row, item }).is_err());
    }

    #[test]
    fn test_order_row_category_parse() {
        assert_eq!(order_row().category().unwrap(), ItemCategory::Toy);

        let mut row = order_row();
        row.item_category = "lamp".to_string();
        assert!(row.category().is_err());
    }
}
