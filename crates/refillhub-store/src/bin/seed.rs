//! # Seed Data Generator
//!
//! Creates a demo account with a back-dated purchase history, so refill
//! reminders, upcoming refills and free-refill redemption all have something
//! to show during development.
//!
//! ## Usage
//! ```bash
//! cargo run -p refillhub-store --bin seed
//!
//! # Specify database path
//! cargo run -p refillhub-store --bin seed -- --db ./data/refillhub.db
//! ```
//!
//! ## Demo Account
//! - Email: `demo@refillhub.test`, password: `refill123`
//! - 120 reward points (enough for one free refill)
//! - Originals bought 45, 38, 33 and 25 days ago, one refill 10 days ago

use chrono::{Duration, Utc};
use refillhub_core::{Catalog, PurchaseRecord, PurchaseType};
use refillhub_store::{Database, DbConfig};
use std::env;

const DEMO_EMAIL: &str = "demo@refillhub.test";
const DEMO_PASSWORD: &str = "refill123";
const DEMO_NAME: &str = "Demo Shopper";
const DEMO_POINTS: u32 = 120;

/// (product id, type, days ago)
const DEMO_HISTORY: &[(&str, PurchaseType, i64)] = &[
    ("1", PurchaseType::Original, 45),
    ("4", PurchaseType::Original, 38),
    ("2", PurchaseType::Original, 33),
    ("6", PurchaseType::Original, 25),
    ("1", PurchaseType::Refill, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./refillhub_dev.db");

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
                println!("RefillHub Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./refillhub_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 RefillHub Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.accounts().exists(DEMO_EMAIL).await? {
        println!("⚠ Demo account {} already exists", DEMO_EMAIL);
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut user = db
        .accounts()
        .signup(DEMO_EMAIL, DEMO_PASSWORD, DEMO_NAME)
        .await?;

    let catalog = Catalog::standard();
    let now = Utc::now();

    for &(product_id, purchase_type, days_ago) in DEMO_HISTORY {
        let product = catalog.get(product_id)?;
        let unit_price = match purchase_type {
            PurchaseType::Original => product.price,
            PurchaseType::Refill => product.refill_price()?,
        };

        user.append_purchase(PurchaseRecord::new(
            product.id.clone(),
            product.name.clone(),
            purchase_type,
            1,
            unit_price,
            now - Duration::days(days_ago),
        )?);
    }

    user.reward_points = DEMO_POINTS;
    user.is_first_time = false;
    db.users().save(&user).await?;

    println!();
    println!("✓ Created {} ({})", DEMO_NAME, DEMO_EMAIL);
    println!("  Password:  {}", DEMO_PASSWORD);
    println!("  Points:    {}", user.reward_points);
    println!("  Purchases: {}", user.purchase_history.len());

    let due = refillhub_core::reminders::refill_due(now, &user.purchase_history);
    println!("  Refills due now: {}", due.len());

    let accounts = db.users().list().await?;
    println!();
    println!("Accounts in store: {}", accounts.len());
    for account in &accounts {
        println!("  {} <{}>  {} pts", account.name, account.email, account.reward_points);
    }

    db.close().await;
    println!();
    println!("🎉 Seed complete!");

    Ok(())
}
