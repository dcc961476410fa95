//! # Order Repository
//!
//! Orders and their immutable lines.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use arcadia_core::{
    CustomerId, Money, NewOrder, Order, OrderDetail, OrderId, OrderLineRequest, OrderStatus,
    PaymentStatus, ProductId, IN_STORE_PAYMENT_METHOD, IN_STORE_PICKUP,
};

use crate::error::DbResult;

const ORDER_COLUMNS: &str = r#"
    id, customer_id, status, payment_status, payment_method, total_amount_cents,
    shipping_fee_cents, delivery_address, delivery_city, billing_address, billing_city,
    tracking_number, order_date, actual_delivery_date, updated_at
"#;

/// Columns written by a status change. `None` leaves a column as it is.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub payment_status: Option<PaymentStatus>,
}

impl StatusUpdate {
    pub fn to(status: OrderStatus) -> Self {
        StatusUpdate {
            status,
            tracking_number: None,
            actual_delivery_date: None,
            payment_status: None,
        }
    }
}

// =============================================================================
// Reads
// =============================================================================

pub async fn get(conn: &mut SqliteConnection, id: OrderId) -> DbResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

/// Lines of an order by line number.
pub async fn lines(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<Vec<OrderDetail>> {
    let lines = sqlx::query_as::<_, OrderDetail>(
        r#"
        SELECT order_id, line_no, product_id, quantity, unit_price_cents
        FROM order_details
        WHERE order_id = ?
        ORDER BY line_no
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(lines)
}

pub async fn line(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    line_no: i64,
) -> DbResult<Option<OrderDetail>> {
    let line = sqlx::query_as::<_, OrderDetail>(
        r#"
        SELECT order_id, line_no, product_id, quantity, unit_price_cents
        FROM order_details
        WHERE order_id = ? AND line_no = ?
        "#,
    )
    .bind(order_id)
    .bind(line_no)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(line)
}

pub async fn line_count(conn: &mut SqliteConnection, order_id: OrderId) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_details WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

// =============================================================================
// Writes
// =============================================================================

/// Inserts a pending online order.
pub async fn insert(
    conn: &mut SqliteConnection,
    order: &NewOrder,
    total: Money,
    now: DateTime<Utc>,
) -> DbResult<OrderId> {
    let result = sqlx::query(
        r#"
        INSERT INTO orders (
            customer_id, status, payment_status, payment_method, total_amount_cents,
            shipping_fee_cents, delivery_address, delivery_city, billing_address, billing_city,
            order_date, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(order.customer_id)
    .bind(OrderStatus::Pending)
    .bind(PaymentStatus::Pending)
    .bind(&order.payment_method)
    .bind(total.cents())
    .bind(order.shipping_fee_cents)
    .bind(order.delivery_address.trim())
    .bind(&order.delivery_city)
    .bind(&order.billing_address)
    .bind(&order.billing_city)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Inserts a walk-in order: already delivered and paid.
pub async fn insert_in_store(
    conn: &mut SqliteConnection,
    customer_id: Option<CustomerId>,
    amount: Money,
    now: DateTime<Utc>,
) -> DbResult<OrderId> {
    let result = sqlx::query(
        r#"
        INSERT INTO orders (
            customer_id, status, payment_status, payment_method, total_amount_cents,
            shipping_fee_cents, delivery_address, order_date, actual_delivery_date, updated_at
        )
        VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
        "#,
    )
    .bind(customer_id)
    .bind(OrderStatus::Delivered)
    .bind(PaymentStatus::Paid)
    .bind(IN_STORE_PAYMENT_METHOD)
    .bind(amount.cents())
    .bind(IN_STORE_PICKUP)
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn insert_line(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    line: &OrderLineRequest,
) -> DbResult<()> {
    insert_detail(
        conn,
        order_id,
        line.line_no,
        line.product_id,
        line.quantity,
        line.unit_price_cents,
    )
    .await
}

pub async fn insert_detail(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    line_no: i64,
    product_id: ProductId,
    quantity: i64,
    unit_price_cents: i64,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO order_details (order_id, line_no, product_id, quantity, unit_price_cents)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(order_id)
    .bind(line_no)
    .bind(product_id)
    .bind(quantity)
    .bind(unit_price_cents)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn apply_status(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    update: &StatusUpdate,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE orders
        SET status = ?,
            tracking_number = COALESCE(?, tracking_number),
            actual_delivery_date = COALESCE(?, actual_delivery_date),
            payment_status = COALESCE(?, payment_status),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.status)
    .bind(&update.tracking_number)
    .bind(update.actual_delivery_date)
    .bind(update.payment_status)
    .bind(now)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
