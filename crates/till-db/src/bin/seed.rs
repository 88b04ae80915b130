//! # Seed Data Generator
//!
//! Populates a database with demo catalog data and a worked example day,
//! for poking at the dashboard during development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p till-db --bin seed
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```
//!
//! ## What Gets Seeded
//! - A small grocery catalog (weight-, volume- and piece-priced products)
//! - Today's cash session, opened with a float
//! - A couple of cash sales and one manual expense
//! - One credit sale with a partial payment outstanding

use std::env;

use till_core::money::Money;
use till_core::types::{MovementKind, PaymentMethod};
use till_core::units::{Quantity, Unit};
use till_db::{CreditLineDraft, Database, DbConfig, NewProduct};

/// (name, price cents, cost cents, stock amount, unit)
const CATALOG: &[(&str, i64, i64, i64, Unit)] = &[
    ("Rice", 400, 250, 25, Unit::Kilogram),
    ("Sugar", 350, 200, 40, Unit::Kilogram),
    ("Flour", 280, 160, 30, Unit::Kilogram),
    ("Lentils", 520, 310, 15, Unit::Kilogram),
    ("Cooking Oil", 900, 620, 60, Unit::Liter),
    ("Milk", 380, 260, 48, Unit::Liter),
    ("Eggs", 45, 30, 360, Unit::Piece),
    ("Bread Loaf", 250, 140, 40, Unit::Piece),
    ("Tea Box", 600, 380, 25, Unit::Piece),
    ("Soap Bar", 180, 95, 80, Unit::Piece),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./till_dev.db");

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
                println!("Till Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Till Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.products().count().await? > 0 {
        println!("⚠ Database already has products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    println!();
    println!("Seeding catalog...");
    let mut product_ids = Vec::new();
    for (name, price, cost, amount, unit) in CATALOG {
        let product = db
            .products()
            .insert(NewProduct {
                name: name.to_string(),
                price_cents: *price,
                cost_cents: *cost,
                initial_stock: Quantity::from_whole(*amount, *unit),
            })
            .await?;
        product_ids.push(product.id);
    }
    println!("  {} products", product_ids.len());

    // Today's session with some activity
    let today = db.today();
    println!();
    println!("Seeding session for {today}...");
    db.sessions().open(today, Money::from_cents(100_000)).await?;

    db.sales()
        .record_cash_sale(
            &product_ids[0],
            Quantity::new(2500, Unit::Kilogram),
            PaymentMethod::Cash,
        )
        .await?;
    db.sales()
        .record_cash_sale(
            &product_ids[6],
            Quantity::from_whole(12, Unit::Piece),
            PaymentMethod::Transfer,
        )
        .await?;
    db.sessions()
        .append_movement(
            today,
            MovementKind::Expense,
            PaymentMethod::Cash,
            Money::from_cents(2_000),
            Some("ice delivery"),
        )
        .await?;

    // An outstanding credit sale
    println!("Seeding credit sale...");
    let recorded = db
        .credit()
        .record_sale(
            "Ana Morales",
            &[CreditLineDraft {
                product_id: product_ids[4].clone(),
                quantity: Quantity::from_whole(2, Unit::Liter),
            }],
        )
        .await?;
    db.credit()
        .record_payment(&recorded.sale.id, Money::from_cents(500), PaymentMethod::Cash)
        .await?;

    let view = db.sessions().get(today).await?;
    println!();
    println!("✓ Seed complete!");
    println!("  Session movements: {}", view.movements.len());
    println!("  Session income:    {}", view.session.income());
    println!(
        "  Outstanding credit: {}",
        db.credit().customer_balance("Ana Morales").await?
    );

    Ok(())
}
