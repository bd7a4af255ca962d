//! # Seed Orders
//!
//! Stores one sample order per category for development.
//!
//! ## Usage
//! ```bash
//! # Use the configured store (store.toml + BAZAAR_* env vars)
//! cargo run -p bazaar-db --bin seed
//!
//! # Specify database path
//! cargo run -p bazaar-db --bin seed -- --db ./data/bazaar.db
//!
//! # Throwaway in-memory store
//! cargo run -p bazaar-db --bin seed -- --memory
//! ```
//!
//! ## Sample Orders
//! Each sample arrives in a different external format:
//! - Cake: delimited row (as read from a CSV line)
//! - Book: structured document (as parsed from JSON)
//! - Toy: markup document with capitalized keys (as parsed from XML)

use serde_json::json;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bazaar_core::mapper::{Format, Mapper, MapperFactory, Record};
use bazaar_core::{generate_id, IdentifiableOrder, ItemCategory};
use bazaar_db::{RepositoryFactory, StoreConfig, StoreKind};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut memory = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--memory" | "-m" => memory = true,
            "--help" | "-h" => {
                println!("Bazaar Seed Orders");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./bazaar.db)");
                println!("  -m, --memory         Use a throwaway in-memory store");
                println!("  -c, --config <PATH>  Store config file (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let mut config = StoreConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.mode = StoreKind::Sqlite;
        config.database_path = path;
    }
    if memory {
        config.mode = StoreKind::Memory;
    }

    let mode = config.store_mode();
    println!("Bazaar Seed Orders");
    println!("==================");
    println!("Store: {}", mode);
    println!();

    let factory = RepositoryFactory::from_config(&config).await?;
    println!("✓ Connected to store");

    for (category, order) in [
        (ItemCategory::Cake, cake_order()?),
        (ItemCategory::Book, book_order()?),
        (ItemCategory::Toy, toy_order()?),
    ] {
        let orders = factory.create(category).await?;
        let id = orders.create(&order).await?;
        let stored = orders.get(&id).await?;

        println!();
        println!("✓ Stored {} order {}", category, id);
        println!("{}", serde_json::to_string_pretty(&stored)?);
    }

    println!();
    for category in ItemCategory::ALL {
        let count = factory.create(category).await?.count().await?;
        println!("  {:<5} orders: {}", category, count);
    }

    factory.database().close().await;
    Ok(())
}

/// A cake order as a delimited row: id, 14 cake fields, price, quantity.
fn cake_order() -> Result<IdentifiableOrder, Box<dyn std::error::Error>> {
    let mapper = MapperFactory::order(ItemCategory::Cake, Format::Delimited)?;
    let row: Vec<String> = [
        generate_id().as_str(),
        "Birthday",
        "Chocolate",
        "Ganache",
        "Large",
        "3",
        "Buttercream",
        "Vanilla",
        "Flowers",
        "Pink",
        "Happy Birthday!",
        "Round",
        "Nuts",
        "Organic Cocoa",
        "Box",
        "45",
        "1",
    ]
    .iter()
    .map(|column| column.to_string())
    .collect();

    Ok(mapper.map(&Record::from(row))?.identify(generate_id())?)
}

/// A book order as a nested structured document.
fn book_order() -> Result<IdentifiableOrder, Box<dyn std::error::Error>> {
    let mapper = MapperFactory::order(ItemCategory::Book, Format::Structured)?;
    let document = json!({
        "id": generate_id(),
        "price": 18,
        "quantity": 2,
        "item": {
            "title": "The Left Hand of Darkness",
            "author": "Ursula K. Le Guin",
            "genre": "Science Fiction",
            "format": "Paperback",
            "language": "English",
            "publisher": "Ace Books",
            "specialEdition": "No",
            "packaging": "Shrink Wrap"
        }
    });

    Ok(mapper.map(&Record::from(document))?.identify(generate_id())?)
}

/// A toy order as a flat markup document with capitalized keys.
fn toy_order() -> Result<IdentifiableOrder, Box<dyn std::error::Error>> {
    let mapper = MapperFactory::order(ItemCategory::Toy, Format::Markup)?;
    let document = json!({
        "OrderID": generate_id(),
        "Type": "Building Blocks",
        "AgeGroup": "8-12",
        "Brand": "Lego",
        "Material": "Plastic",
        "BatteryRequired": "No",
        "Educational": "Yes",
        "Price": "60",
        "Quantity": "1"
    });

    Ok(mapper.map(&Record::from(document))?.identify(generate_id())?)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bazaar=trace` - Show trace for bazaar crates only
/// - Default: INFO level, DEBUG for bazaar
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bazaar=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
