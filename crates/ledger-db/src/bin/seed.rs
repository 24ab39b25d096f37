//! # Demo Data Loader
//!
//! Creates (or opens) a ledger database and loads the demo dataset into it.
//!
//! ## Usage
//! ```bash
//! # Seed ./ledger_dev.db (default)
//! cargo run -p ledger-db --bin seed
//!
//! # Specify database path
//! cargo run -p ledger-db --bin seed -- --db ./data/ledger.db
//! ```
//!
//! A database whose catalog is not empty is left untouched.

use std::env;

use ledger_db::seed::seed_demo_data;
use ledger_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,ledger_db=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ledger_dev.db");

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
                println!("Supply Ledger demo data loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Supply Ledger demo data loader");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    match seed_demo_data(&db).await? {
        Some(summary) => {
            println!(
                "✓ Loaded {} materials, {} units of measure, {} opening receipts",
                summary.materials, summary.units, summary.receipts
            );
        }
        None => {
            let existing = db.materials().count().await?;
            println!("⚠ Catalog already has {} materials", existing);
            println!("  Skipping seed to avoid duplicates.");
            println!("  Delete the database file to regenerate.");
        }
    }

    db.close().await;
    Ok(())
}
