//! # Seed Data Generator
//!
//! Populates the database with a realistic liquor shop catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p theka-db --bin seed
//!
//! # Specify database path
//! cargo run -p theka-db --bin seed -- --db ./data/theka.db
//! ```
//!
//! Stock is added through the ledger, not raw inserts, so every seeded
//! brand also gets its stock entry and the weekly history view has data to
//! show - the same shape a real shop accumulates.

use std::env;
use std::sync::Arc;

use theka_core::{Money, SharedSecret};
use theka_db::{Database, DbConfig};

/// Brand catalog for realistic test data: (name, [(variant, price in rupees)]).
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "Royal Stag",
        &[("750ml", 1200), ("375ml", 650), ("180ml", 340)],
    ),
    (
        "Imperial Blue",
        &[("750ml", 900), ("375ml", 480), ("180ml", 250)],
    ),
    (
        "Blenders Pride",
        &[("750ml", 1550), ("375ml", 800)],
    ),
    (
        "McDowell's No.1",
        &[("750ml", 950), ("375ml", 500), ("180ml", 260)],
    ),
    ("Old Monk", &[("1L", 900), ("750ml", 700), ("375ml", 380)]),
    ("Magic Moments", &[("750ml", 1100), ("375ml", 580)]),
    ("Kingfisher Premium", &[("650ml", 180), ("330ml", 110)]),
    ("Bira 91 White", &[("650ml", 220), ("330ml", 130)]),
    (
        "Johnnie Walker",
        &[("Black Label 750ml", 3800), ("Red Label 750ml", 2200)],
    ),
    ("Absolut", &[("750ml", 2400)]),
    ("Bacardi Carta Blanca", &[("750ml", 1600)]),
    ("Sula Shiraz", &[("750ml", 950)]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./theka_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Theka POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./theka_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🍾 Theka POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing catalog
    let existing = db.brands().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} brands", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let owner_password =
        env::var("THEKA_OWNER_PASSWORD").unwrap_or_else(|_| "theka-dev-password".to_string());
    let ledger = db.ledger(Arc::new(SharedSecret::new(owner_password)));

    // Generate stock through the ledger
    println!();
    println!("Stocking shelves...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for (brand_idx, (name, variants)) in CATALOG.iter().enumerate() {
        for (variant_idx, (variant, price_rupees)) in variants.iter().enumerate() {
            // Deterministic pseudo-random quantity: 2-25 bottles
            let quantity = 2 + ((brand_idx * 7 + variant_idx * 13) % 24) as i64;

            let receipt = ledger
                .add_stock(name, variant, Money::from_rupees(*price_rupees), quantity)
                .await?;
            generated += 1;

            println!("  {}", receipt.message);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Stocked {} brands in {:?}", generated, elapsed);

    // Verify the views have something to show
    println!();
    println!("Verifying queries...");
    let levels = db.analytics().stock_levels().await?;
    println!("  Stock levels: {} brands", levels.len());

    let history = db.analytics().weekly_stock_history().await?;
    println!("  Weekly history: {} week group(s)", history.len());

    let matches = db.brands().search("royal").await?;
    println!("  Search 'royal': {} result(s)", matches.len());

    let summary = db.analytics().summary(None, None).await?;
    println!();
    println!("Analytics snapshot:");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
