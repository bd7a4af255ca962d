//! # Toy Repository
//!
//! The `toys` table.

use bazaar_core::mapper::{ToyRow, ToyRowMapper};
use bazaar_core::{Item, ItemCategory, Toy};

use super::item::{ItemRepository, StoredItem};

/// Repository for the `toys` table.
pub type ToyRepository = ItemRepository<Toy>;

impl StoredItem for Toy {
    type Row = ToyRow;
    type RowMapper = ToyRowMapper;

    const CATEGORY: ItemCategory = ItemCategory::Toy;
    const ROW_MAPPER: ToyRowMapper = ToyRowMapper;

    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS toys (
            id TEXT PRIMARY KEY,
            type TEXT NOT NULL,
            age_group TEXT NOT NULL,
            brand TEXT NOT NULL,
            material TEXT NOT NULL,
            battery_required TEXT NOT NULL,
            educational TEXT NOT NULL
        )
    "#;

    const INSERT: &'static str = r#"
        INSERT INTO toys (id, type, age_group, brand, material, battery_required, educational)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#;

    const SELECT_BY_ID: &'static str = "SELECT * FROM toys WHERE id = ?1";

    const SELECT_ALL: &'static str = "SELECT * FROM toys ORDER BY id";

    const UPDATE: &'static str = r#"
        UPDATE toys SET
            type = ?1,
            age_group = ?2,
            brand = ?3,
            material = ?4,
            battery_required = ?5,
            educational = ?6
        WHERE id = ?7
    "#;

    const DELETE: &'static str = "DELETE FROM toys WHERE id = ?1";

    fn columns(row: &ToyRow) -> Vec<&str> {
        vec![
            row.kind.as_str(),
            row.age_group.as_str(),
            row.brand.as_str(),
            row.material.as_str(),
            row.battery_required.as_str(),
            row.educational.as_str(),
        ]
    }

    fn into_item(self) -> Item {
        Item::Toy(self)
    }

    fn from_item(item: &Item) -> Option<&Self> {
        item.as_toy()
    }
}
