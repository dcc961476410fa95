//! # Sales Ledger
//!
//! Standing revenue. A row is appended when an order or walk-in sale is
//! recorded and deleted when that order is cancelled or returned, so the
//! table never holds reversed revenue.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use arcadia_core::{BranchId, Money, OrderId, Sale, SaleType};

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct NewSale {
    pub order_id: OrderId,
    pub branch_id: Option<BranchId>,
    pub sale_type: SaleType,
    pub amount: Money,
    pub cost: Money,
}

pub async fn insert(conn: &mut SqliteConnection, sale: &NewSale, now: DateTime<Utc>) -> DbResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO sales (order_id, branch_id, sale_type, transaction_amount_cents, cost_cents, sale_date)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(sale.order_id)
    .bind(sale.branch_id)
    .bind(sale.sale_type)
    .bind(sale.amount.cents())
    .bind(sale.cost.cents())
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn for_order(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<Vec<Sale>> {
    let sales = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, order_id, branch_id, sale_type, transaction_amount_cents, cost_cents, sale_date
        FROM sales
        WHERE order_id = ?
        ORDER BY id
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(sales)
}

/// Non-null branches recorded on an order's sales.
pub async fn branches_for_order(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> DbResult<Vec<BranchId>> {
    let branches: Vec<BranchId> = sqlx::query_scalar(
        "SELECT DISTINCT branch_id FROM sales WHERE order_id = ? AND branch_id IS NOT NULL ORDER BY branch_id",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(branches)
}

/// Reverses an order's revenue; returns the number of deleted rows.
pub async fn delete_for_order(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM sales WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut *conn)
        .await?;

    debug!(order_id, removed = result.rows_affected(), "Sales reversed");
    Ok(result.rows_affected())
}
