//! # Book Repository
//!
//! The `books` table.

use bazaar_core::mapper::{BookRow, BookRowMapper};
use bazaar_core::{Book, Item, ItemCategory};

use super::item::{ItemRepository, StoredItem};

/// Repository for the `books` table.
pub type BookRepository = ItemRepository<Book>;

impl StoredItem for Book {
    type Row = BookRow;
    type RowMapper = BookRowMapper;

    const CATEGORY: ItemCategory = ItemCategory::Book;
    const ROW_MAPPER: BookRowMapper = BookRowMapper;

    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            genre TEXT NOT NULL,
            format TEXT NOT NULL,
            language TEXT NOT NULL,
            publisher TEXT NOT NULL,
            special_edition TEXT NOT NULL,
            packaging TEXT NOT NULL
        )
    "#;

    const INSERT: &'static str = r#"
        INSERT INTO books (
            id, title, author, genre, format, language, publisher, special_edition, packaging
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    "#;

    const SELECT_BY_ID: &'static str = "SELECT * FROM books WHERE id = ?1";

    const SELECT_ALL: &'static str = "SELECT * FROM books ORDER BY id";

    const UPDATE: &'static str = r#"
        UPDATE books SET
            title = ?1,
            author = ?2,
            genre = ?3,
            format = ?4,
            language = ?5,
            publisher = ?6,
            special_edition = ?7,
            packaging = ?8
        WHERE id = ?9
    "#;

    const DELETE: &'static str = "DELETE FROM books WHERE id = ?1";

    fn columns(row: &BookRow) -> Vec<&str> {
        vec![
            row.title.as_str(),
            row.author.as_str(),
            row.genre.as_str(),
            row.format.as_str(),
            row.language.as_str(),
            row.publisher.as_str(),
            row.special_edition.as_str(),
            row.packaging.as_str(),
        ]
    }

    fn into_item(self) -> Item {
        Item::Book(self)
    }

    fn from_item(item: &Item) -> Option<&Self> {
        item.as_book()
    }
}
