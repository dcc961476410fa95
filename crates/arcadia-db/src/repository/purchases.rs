//! # Purchase Repository
//!
//! Supplier restock records. Payment is settled outside the engine, so every
//! purchase starts out pending.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use arcadia_core::{PaymentStatus, ProductId, Purchase, RestockRequest};

use crate::error::DbResult;

pub async fn insert(
    conn: &mut SqliteConnection,
    request: &RestockRequest,
    now: DateTime<Utc>,
) -> DbResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO purchases (
            supplier_id, product_id, branch_id, quantity, unit_cost_cents, payment_status, purchased_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(request.supplier_id)
    .bind(request.product_id)
    .bind(request.branch_id)
    .bind(request.quantity)
    .bind(request.unit_cost_cents)
    .bind(PaymentStatus::Pending)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn for_product(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> DbResult<Vec<Purchase>> {
    let purchases = sqlx::query_as::<_, Purchase>(
        r#"
        SELECT id, supplier_id, product_id, branch_id, quantity, unit_cost_cents,
               payment_status, purchased_at
        FROM purchases
        WHERE product_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(purchases)
}
