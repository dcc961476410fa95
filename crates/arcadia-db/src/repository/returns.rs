//! # Return Repository
//!
//! One row per (order, line). The refund amount is fixed when the row is
//! created; `refund_date` is only set while the row is completed.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use arcadia_core::{OrderDetail, OrderId, ReturnId, ReturnRecord, ReturnStatus};

use crate::error::DbResult;

const RETURN_COLUMNS: &str = r#"
    id, order_id, line_no, product_id, quantity, reason, status,
    refund_amount_cents, requested_at, refund_date
"#;

pub async fn get(conn: &mut SqliteConnection, id: ReturnId) -> DbResult<Option<ReturnRecord>> {
    let sql = format!("SELECT {RETURN_COLUMNS} FROM returns WHERE id = ?");
    let record = sqlx::query_as::<_, ReturnRecord>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(record)
}

pub async fn for_order(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<Vec<ReturnRecord>> {
    let sql = format!("SELECT {RETURN_COLUMNS} FROM returns WHERE order_id = ? ORDER BY line_no, id");
    let records = sqlx::query_as::<_, ReturnRecord>(&sql)
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(records)
}

pub async fn count_for_order(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM returns WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Number of distinct lines of an order whose return is completed.
pub async fn completed_lines(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT line_no) FROM returns WHERE order_id = ? AND status = ?",
    )
    .bind(order_id)
    .bind(ReturnStatus::Completed)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

/// Inserts a return row for one order line; refund is `quantity × unit_price`.
pub async fn insert(
    conn: &mut SqliteConnection,
    line: &OrderDetail,
    reason: &str,
    status: ReturnStatus,
    now: DateTime<Utc>,
) -> DbResult<ReturnId> {
    let refund_date = (status == ReturnStatus::Completed).then_some(now);

    let result = sqlx::query(
        r#"
        INSERT INTO returns (
            order_id, line_no, product_id, quantity, reason, status,
            refund_amount_cents, requested_at, refund_date
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(line.order_id)
    .bind(line.line_no)
    .bind(line.product_id)
    .bind(line.quantity)
    .bind(reason.trim())
    .bind(status)
    .bind(line.line_total().cents())
    .bind(now)
    .bind(refund_date)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: ReturnId,
    status: ReturnStatus,
    refund_date: Option<DateTime<Utc>>,
) -> DbResult<()> {
    sqlx::query("UPDATE returns SET status = ?, refund_date = ? WHERE id = ?")
        .bind(status)
        .bind(refund_date)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Completes every non-completed row of an order; returns the number promoted.
pub async fn complete_open(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    now: DateTime<Utc>,
) -> DbResult<u64> {
    let result = sqlx::query(
        "UPDATE returns SET status = ?, refund_date = ? WHERE order_id = ? AND status <> ?",
    )
    .bind(ReturnStatus::Completed)
    .bind(now)
    .bind(order_id)
    .bind(ReturnStatus::Completed)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}
