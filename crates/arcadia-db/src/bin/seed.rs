//! # Seed Data Generator
//!
//! Populates a development database with branches, customers, a supplier and
//! a games/consoles catalog stocked across branches.
//!
//! ## Usage
//! ```bash
//! cargo run -p arcadia-db --bin seed
//! cargo run -p arcadia-db --bin seed -- --db ./data/arcadia.db --stock 40
//! ```
//!
//! Stock is loaded through `StockService::restock`, so every unit arrives
//! with a purchase record and a stock log row.

use std::env;

use arcadia_core::{ProductType, RestockRequest};
use arcadia_db::repository::catalog;
use arcadia_db::{Database, DbConfig};

const BRANCHES: &[(&str, &str)] = &[
    ("Arcadia Downtown", "Portland"),
    ("Arcadia Eastside", "Portland"),
    ("Arcadia Harbor", "Seattle"),
];

const CUSTOMERS: &[(&str, &str)] = &[
    ("Walk-in Customer", "walkin@arcadia.example"),
    ("Sam Rivera", "sam@example.com"),
    ("Jordan Lee", "jordan@example.com"),
];

/// (name, type, price in cents)
const CATALOG: &[(&str, ProductType, i64)] = &[
    ("PlayStation 5", ProductType::Console, 49999),
    ("Xbox Series X", ProductType::Console, 49999),
    ("Nintendo Switch OLED", ProductType::Console, 34999),
    ("Steam Deck 512GB", ProductType::Console, 54900),
    ("Elden Ring", ProductType::Game, 5999),
    ("Halo Infinite", ProductType::Game, 3999),
    ("The Legend of Zelda: Tears of the Kingdom", ProductType::Game, 6999),
    ("Baldur's Gate 3", ProductType::Game, 5999),
    ("Hades II", ProductType::Game, 2999),
    ("Forza Horizon 5", ProductType::Game, 4999),
    ("Super Mario Bros. Wonder", ProductType::Game, 5999),
    ("Final Fantasy VII Rebirth", ProductType::Game, 6999),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./arcadia_dev.db");
    let mut stock: i64 = 25;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if i + 1 < args.len() {
                    stock = args[i + 1].parse().unwrap_or(25);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Arcadia Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./arcadia_dev.db)");
                println!("  -s, --stock <N>     Base units per product per branch (default: 25)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Arcadia Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let mut conn = db.pool().acquire().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&mut *conn)
        .await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut branch_ids = Vec::new();
    for (name, city) in BRANCHES {
        branch_ids.push(catalog::insert_branch(&mut conn, name, Some(city)).await?);
    }
    for (name, email) in CUSTOMERS {
        catalog::insert_customer(&mut conn, name, email).await?;
    }
    let supplier_id = catalog::insert_supplier(&mut conn, "Pixel Distribution Co.").await?;

    let mut product_ids = Vec::new();
    for (name, product_type, price_cents) in CATALOG {
        product_ids.push(catalog::insert_product(&mut conn, name, *product_type, *price_cents).await?);
    }
    drop(conn);

    println!("✓ {} branches, {} customers, {} products", branch_ids.len(), CUSTOMERS.len(), product_ids.len());

    let stock_service = db.stock();
    let mut units = 0;
    for (p, product_id) in product_ids.iter().enumerate() {
        for (b, branch_id) in branch_ids.iter().enumerate() {
            // Uneven depths so allocation has a clear deepest branch.
            let quantity = (stock + ((p * 7 + b * 5) % 11) as i64).max(1);
            let unit_cost_cents = CATALOG[p].2 * 55 / 100;

            stock_service
                .restock(&RestockRequest {
                    product_id: *product_id,
                    branch_id: *branch_id,
                    supplier_id,
                    quantity,
                    unit_cost_cents,
                })
                .await?;
            units += quantity;
        }
    }

    println!("✓ Restocked {} units", units);
    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
