//! # Catalog Repository
//!
//! Products, branches, customers, suppliers and carts.
//!
//! These tables are managed by other systems; the engine reads product names
//! and prices, checks references, anchors in-store sales to a customer and
//! clears carts. The insert functions exist for seeding and tests.

use sqlx::SqliteConnection;
use tracing::debug;

use arcadia_core::{BranchId, CustomerId, Product, ProductId, ProductType, SupplierId};

use crate::error::DbResult;

// =============================================================================
// Reads
// =============================================================================

pub async fn product(conn: &mut SqliteConnection, id: ProductId) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, product_type, price_cents, stock_alert_level
        FROM products
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

pub async fn branch_exists(conn: &mut SqliteConnection, id: BranchId) -> DbResult<bool> {
    exists(conn, "SELECT EXISTS(SELECT 1 FROM branches WHERE id = ?)", id).await
}

pub async fn customer_exists(conn: &mut SqliteConnection, id: CustomerId) -> DbResult<bool> {
    exists(conn, "SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?)", id).await
}

pub async fn supplier_exists(conn: &mut SqliteConnection, id: SupplierId) -> DbResult<bool> {
    exists(conn, "SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = ?)", id).await
}

async fn exists(conn: &mut SqliteConnection, sql: &'static str, id: i64) -> DbResult<bool> {
    let found: i64 = sqlx::query_scalar(sql).bind(id).fetch_one(&mut *conn).await?;
    Ok(found != 0)
}

/// Lowest customer id, used to anchor walk-in sales.
pub async fn first_customer(conn: &mut SqliteConnection) -> DbResult<Option<CustomerId>> {
    let id: Option<CustomerId> = sqlx::query_scalar("SELECT MIN(id) FROM customers")
        .fetch_one(&mut *conn)
        .await?;
    Ok(id)
}

// =============================================================================
// Carts
// =============================================================================

pub async fn add_to_cart(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
    product_id: ProductId,
    quantity: i64,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO cart_items (customer_id, product_id, quantity)
        VALUES (?, ?, ?)
        ON CONFLICT (customer_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity
        "#,
    )
    .bind(customer_id)
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn cart_size(conn: &mut SqliteConnection, customer_id: CustomerId) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE customer_id = ?")
        .bind(customer_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Empties a customer's cart; returns the number of removed items.
pub async fn clear_cart(conn: &mut SqliteConnection, customer_id: CustomerId) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE customer_id = ?")
        .bind(customer_id)
        .execute(&mut *conn)
        .await?;

    debug!(customer_id, removed = result.rows_affected(), "Cart cleared");
    Ok(result.rows_affected())
}

// =============================================================================
// Inserts (seeding and tests)
// =============================================================================

pub async fn insert_product(
    conn: &mut SqliteConnection,
    name: &str,
    product_type: ProductType,
    price_cents: i64,
) -> DbResult<ProductId> {
    let result = sqlx::query(
        "INSERT INTO products (name, product_type, price_cents) VALUES (?, ?, ?)",
    )
    .bind(name)
    .bind(product_type)
    .bind(price_cents)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_branch(
    conn: &mut SqliteConnection,
    name: &str,
    city: Option<&str>,
) -> DbResult<BranchId> {
    let result = sqlx::query("INSERT INTO branches (name, city) VALUES (?, ?)")
        .bind(name)
        .bind(city)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_customer(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
) -> DbResult<CustomerId> {
    let result = sqlx::query("INSERT INTO customers (name, email) VALUES (?, ?)")
        .bind(name)
        .bind(email)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_supplier(conn: &mut SqliteConnection, name: &str) -> DbResult<SupplierId> {
    let result = sqlx::query("INSERT INTO suppliers (name) VALUES (?)")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    Ok(result.last_insert_rowid())
}
