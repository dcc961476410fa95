//! # Inventory Ledger
//!
//! Per-(product, branch) quantity counters and their audit trail.
//!
//! ## Quantity Changes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  reserve(product, qty)        deepest branch, never split              │
//! │  adjust(product, branch, ±n)  one branch, result must stay >= 0        │
//! │  credit(product, branch, n)   upsert, creates the row when absent      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  UPDATE inventory ...                                                  │
//! │  INSERT INTO stock_logs (old_quantity, new_quantity, reason)           │
//! │                                                                         │
//! │  Both statements run on the caller's transaction, so a rolled-back     │
//! │  order leaves neither a quantity change nor a log row behind.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers hold a `BEGIN IMMEDIATE` transaction, so the quantities read here
//! cannot change before the write that follows.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use arcadia_core::allocation::{plan_debit, plan_reservation, Reservation};
use arcadia_core::{BranchId, InventoryRow, Product, ProductId, StockLog, StockMovement};

use crate::error::{DbResult, EngineResult};

// =============================================================================
// Reads
// =============================================================================

/// All inventory rows of a product, lowest branch id first.
pub async fn rows_for_product(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> DbResult<Vec<InventoryRow>> {
    let rows = sqlx::query_as::<_, InventoryRow>(
        r#"
        SELECT id, product_id, branch_id, quantity, minimum_stock, maximum_stock, updated_at
        FROM inventory
        WHERE product_id = ?
        ORDER BY branch_id
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

/// Branches holding a row for the product, whatever its quantity.
pub async fn stocking_branches(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> DbResult<Vec<BranchId>> {
    let branches: Vec<BranchId> =
        sqlx::query_scalar("SELECT branch_id FROM inventory WHERE product_id = ? ORDER BY branch_id")
            .bind(product_id)
            .fetch_all(&mut *conn)
            .await?;
    Ok(branches)
}

pub async fn quantity_at(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    branch_id: BranchId,
) -> DbResult<Option<i64>> {
    let quantity: Option<i64> =
        sqlx::query_scalar("SELECT quantity FROM inventory WHERE product_id = ? AND branch_id = ?")
            .bind(product_id)
            .bind(branch_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(quantity)
}

/// Newest stock log rows first.
pub async fn recent_logs(conn: &mut SqliteConnection, limit: u32) -> DbResult<Vec<StockLog>> {
    let logs = sqlx::query_as::<_, StockLog>(
        r#"
        SELECT id, product_id, branch_id, old_quantity, new_quantity, reason, changed_at
        FROM stock_logs
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit as i64)
    .fetch_all(&mut *conn)
    .await?;

    Ok(logs)
}

// =============================================================================
// Writes
// =============================================================================

/// Debits one order line from the deepest branch.
///
/// Fails with `OutOfStock` when that branch cannot cover the whole quantity.
pub async fn reserve(
    conn: &mut SqliteConnection,
    product: &Product,
    quantity: i64,
) -> EngineResult<Reservation> {
    let rows = rows_for_product(conn, product.id).await?;
    let reservation = plan_reservation(&product.name, &rows, quantity)?;

    write_quantity(
        conn,
        product.id,
        reservation.branch_id,
        reservation.old_quantity,
        reservation.new_quantity,
        StockMovement::Reservation,
    )
    .await?;

    debug!(
        product_id = product.id,
        branch_id = reservation.branch_id,
        quantity,
        remaining = reservation.new_quantity,
        "Stock reserved"
    );
    Ok(reservation)
}

/// Applies a signed delta at one branch and returns the new quantity.
///
/// Positive deltas go through [`credit`]. For debits a missing row counts as
/// zero, and a shortfall fails with `InsufficientStock` and writes nothing.
pub async fn adjust(
    conn: &mut SqliteConnection,
    product: &Product,
    branch_id: BranchId,
    delta: i64,
    reason: StockMovement,
) -> EngineResult<i64> {
    if delta >= 0 {
        return Ok(credit(conn, product.id, branch_id, delta, reason).await?);
    }

    let current = quantity_at(conn, product.id, branch_id).await?;
    let new_quantity = plan_debit(&product.name, branch_id, current, -delta)?;
    let old_quantity = new_quantity - delta;

    write_quantity(conn, product.id, branch_id, old_quantity, new_quantity, reason).await?;
    Ok(new_quantity)
}

/// Adds stock at a branch, creating the row when absent.
pub async fn credit(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    branch_id: BranchId,
    quantity: i64,
    reason: StockMovement,
) -> DbResult<i64> {
    let now = Utc::now();

    let new_quantity: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO inventory (product_id, branch_id, quantity, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (product_id, branch_id)
        DO UPDATE SET quantity = quantity + excluded.quantity, updated_at = excluded.updated_at
        RETURNING quantity
        "#,
    )
    .bind(product_id)
    .bind(branch_id)
    .bind(quantity)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    append_log(conn, product_id, branch_id, new_quantity - quantity, new_quantity, reason).await?;

    debug!(product_id, branch_id, quantity, new_quantity, ?reason, "Stock credited");
    Ok(new_quantity)
}

async fn write_quantity(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    branch_id: BranchId,
    old_quantity: i64,
    new_quantity: i64,
    reason: StockMovement,
) -> DbResult<()> {
    sqlx::query(
        "UPDATE inventory SET quantity = ?, updated_at = ? WHERE product_id = ? AND branch_id = ?",
    )
    .bind(new_quantity)
    .bind(Utc::now())
    .bind(product_id)
    .bind(branch_id)
    .execute(&mut *conn)
    .await?;

    append_log(conn, product_id, branch_id, old_quantity, new_quantity, reason).await
}

async fn append_log(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    branch_id: BranchId,
    old_quantity: i64,
    new_quantity: i64,
    reason: StockMovement,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_logs (product_id, branch_id, old_quantity, new_quantity, reason, changed_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(product_id)
    .bind(branch_id)
    .bind(old_quantity)
    .bind(new_quantity)
    .bind(reason)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;
    Ok(())
}
