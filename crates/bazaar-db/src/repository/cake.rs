//! # Cake Repository
//!
//! The `cakes` table.

use bazaar_core::mapper::{CakeRow, CakeRowMapper};
use bazaar_core::{Cake, Item, ItemCategory};

use super::item::{ItemRepository, StoredItem};

/// Repository for the `cakes` table.
pub type CakeRepository = ItemRepository<Cake>;

impl StoredItem for Cake {
    type Row = CakeRow;
    type RowMapper = CakeRowMapper;

    const CATEGORY: ItemCategory = ItemCategory::Cake;
    const ROW_MAPPER: CakeRowMapper = CakeRowMapper;

    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS cakes (
            id TEXT PRIMARY KEY,
            type TEXT NOT NULL,
            flavor TEXT NOT NULL,
            filling TEXT NOT NULL,
            size TEXT NOT NULL,
            layers TEXT NOT NULL,
            frosting_type TEXT NOT NULL,
            frosting_flavor TEXT NOT NULL,
            decoration_type TEXT NOT NULL,
            decoration_color TEXT NOT NULL,
            custom_message TEXT NOT NULL,
            shape TEXT NOT NULL,
            allergies TEXT NOT NULL,
            special_ingredients TEXT NOT NULL,
            packaging_type TEXT NOT NULL
        )
    "#;

    const INSERT: &'static str = r#"
        INSERT INTO cakes (
            id, type, flavor, filling, size, layers,
            frosting_type, frosting_flavor, decoration_type, decoration_color,
            custom_message, shape, allergies, special_ingredients, packaging_type
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15
        )
    "#;

    const SELECT_BY_ID: &'static str = "SELECT * FROM cakes WHERE id = ?1";

    const SELECT_ALL: &'static str = "SELECT * FROM cakes ORDER BY id";

    const UPDATE: &'static str = r#"
        UPDATE cakes SET
            type = ?1,
            flavor = ?2,
            filling = ?3,
            size = ?4,
            layers = ?5,
            frosting_type = ?6,
            frosting_flavor = ?7,
            decoration_type = ?8,
            decoration_color = ?9,
            custom_message = ?10,
            shape = ?11,
            allergies = ?12,
            special_ingredients = ?13,
            packaging_type = ?14
        WHERE id = ?15
    "#;

    const DELETE: &'static str = "DELETE FROM cakes WHERE id = ?1";

    fn columns(row: &CakeRow) -> Vec<&str> {
        vec![
            row.kind.as_str(),
            row.flavor.as_str(),
            row.filling.as_str(),
            row.size.as_str(),
            row.layers.as_str(),
            row.frosting_type.as_str(),
            row.frosting_flavor.as_str(),
            row.decoration_type.as_str(),
            row.decoration_color.as_str(),
            row.custom_message.as_str(),
            row.shape.as_str(),
            row.allergies.as_str(),
            row.special_ingredients.as_str(),
            row.packaging_type.as_str(),
        ]
    }

    fn into_item(self) -> Item {
        Item::Cake(self)
    }

    fn from_item(item: &Item) -> Option<&Self> {
        item.as_cake()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
