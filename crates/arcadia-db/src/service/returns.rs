//! # Return Service
//!
//! Per-line return requests and their reconciliation with inventory and
//! revenue.
//!
//! ## Partial Returns
//! ```text
//! order 12: line 1 (2 × $59.99), line 2 (1 × $499.99)
//!
//! requestReturn(12)      → return #1 (line 1, pending), #2 (line 2, pending)
//! #1 → completed         → line 1 restocked; 1 of 2 lines done; order unchanged
//! #2 → completed         → line 2 restocked; 2 of 2 lines done
//!                          → order returned, sales deleted, payment refunded
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument};

use arcadia_core::status::{plan_return_change, ReturnEffect};
use arcadia_core::{
    CoreError, OrderId, OrderStatus, PaymentStatus, ReturnId, ReturnRecord, ReturnRequest,
    ReturnStatus,
};

use crate::error::EngineResult;
use crate::pool::begin_write;
use crate::repository::orders::StatusUpdate;
use crate::repository::{orders, returns, sales};
use crate::service::compensation;

#[derive(Debug, Clone)]
pub struct ReturnService {
    pool: SqlitePool,
}

impl ReturnService {
    pub fn new(pool: SqlitePool) -> Self {
        ReturnService { pool }
    }

    /// Opens one pending return per line of the order.
    ///
    /// ## Errors
    /// - `Validation`: blank reason
    /// - `OrderNotFound`
    /// - `OrderNotReturnable`: the order is cancelled or returned
    /// - `ReturnAlreadyRequested`: any return row exists for the order
    /// - `OrderHasNoLines`
    #[instrument(skip(self, request), fields(order_id = request.order_id))]
    pub async fn request_return(&self, request: &ReturnRequest) -> EngineResult<Vec<ReturnRecord>> {
        request.validate()?;
        let order_id = request.order_id;

        let mut tx = begin_write(&self.pool).await?;

        let order = orders::get(&mut tx, order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;

        if order.status.is_terminal() {
            return Err(CoreError::OrderNotReturnable {
                order_id,
                status: order.status,
            }
            .into());
        }

        if returns::count_for_order(&mut tx, order_id).await? > 0 {
            return Err(CoreError::ReturnAlreadyRequested(order_id).into());
        }

        let lines = orders::lines(&mut tx, order_id).await?;
        if lines.is_empty() {
            return Err(CoreError::OrderHasNoLines(order_id).into());
        }

        let now = Utc::now();
        for line in &lines {
            returns::insert(&mut tx, line, &request.reason, ReturnStatus::Pending, now).await?;
        }

        let records = returns::for_order(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(order_id, lines = records.len(), "Return requested");
        Ok(records)
    }

    /// Moves a return row to `target`.
    ///
    /// Completing a row restocks its line once. When every line of the order
    /// is completed the order becomes returned, its sales are deleted and its
    /// payment is marked refunded.
    #[instrument(skip(self))]
    pub async fn update_return_status(
        &self,
        return_id: ReturnId,
        target: ReturnStatus,
    ) -> EngineResult<ReturnRecord> {
        let mut tx = begin_write(&self.pool).await?;

        let record = returns::get(&mut tx, return_id)
            .await?
            .ok_or(CoreError::ReturnNotFound(return_id))?;

        let now = Utc::now();
        match plan_return_change(return_id, record.status, target)? {
            ReturnEffect::Unchanged => return Ok(record),
            ReturnEffect::Reopen => {
                returns::set_status(&mut tx, return_id, ReturnStatus::Pending, None).await?;
            }
            ReturnEffect::StatusOnly => {
                returns::set_status(&mut tx, return_id, target, record.refund_date).await?;
            }
            ReturnEffect::Complete => {
                returns::set_status(&mut tx, return_id, ReturnStatus::Completed, Some(now)).await?;
                settle_completed(&mut tx, &record, now).await?;
            }
        }

        let updated = returns::get(&mut tx, return_id)
            .await?
            .ok_or(CoreError::ReturnNotFound(return_id))?;

        tx.commit().await?;

        info!(return_id, from = %record.status, to = %target, "Return status updated");
        Ok(updated)
    }

    /// Return rows of an order, by line.
    pub async fn list_returns(&self, order_id: OrderId) -> EngineResult<Vec<ReturnRecord>> {
        let mut conn = self.pool.acquire().await?;

        if orders::get(&mut conn, order_id).await?.is_none() {
            return Err(CoreError::OrderNotFound(order_id).into());
        }

        Ok(returns::for_order(&mut conn, order_id).await?)
    }
}

/// Restocks a newly completed line and returns the order once every line is done.
async fn settle_completed(
    conn: &mut SqliteConnection,
    record: &ReturnRecord,
    now: DateTime<Utc>,
) -> EngineResult<()> {
    let order_id = record.order_id;
    let order = orders::get(conn, order_id)
        .await?
        .ok_or(CoreError::OrderNotFound(order_id))?;

    // A cancelled or returned order already had all its lines restocked.
    if order.status.is_terminal() {
        debug!(order_id, status = %order.status, "Order already reversed; no restock");
        return Ok(());
    }

    let line = orders::line(conn, order_id, record.line_no)
        .await?
        .ok_or(CoreError::OrderHasNoLines(order_id))?;
    let sale_branches = sales::branches_for_order(conn, order_id).await?;
    compensation::restore_line(conn, &line, &sale_branches).await?;

    let line_count = orders::line_count(conn, order_id).await?;
    let completed = returns::completed_lines(conn, order_id).await?;

    if completed >= line_count {
        sales::delete_for_order(conn, order_id).await?;

        let mut update = StatusUpdate::to(OrderStatus::Returned);
        update.payment_status = Some(PaymentStatus::Refunded);
        orders::apply_status(conn, order_id, &update, now).await?;

        info!(order_id, "All lines returned; order marked returned");
    } else {
        debug!(order_id, completed, line_count, "Partial return");
    }

    Ok(())
}
