//! Stock restoration and revenue reversal shared by order cancellation,
//! admin-driven returns and completed return requests.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::{debug, warn};

use arcadia_core::allocation::{choose_restore_branch, RestoreCandidates, RESTORE_STRATEGIES};
use arcadia_core::{BranchId, Order, OrderDetail, ReturnStatus, StockMovement, ADMIN_RETURN_REASON};

use crate::error::EngineResult;
use crate::repository::{inventory, orders, returns, sales};

/// Credits one line back to the branch picked by the restore strategies.
///
/// Returns the credited branch, or `None` when no branch stocks the product
/// and the line was skipped.
pub(crate) async fn restore_line(
    conn: &mut SqliteConnection,
    line: &OrderDetail,
    sale_branches: &[BranchId],
) -> EngineResult<Option<BranchId>> {
    let candidates = RestoreCandidates {
        sale_branches: sale_branches.to_vec(),
        stocking_branches: inventory::stocking_branches(conn, line.product_id).await?,
    };

    let Some(branch_id) = choose_restore_branch(&RESTORE_STRATEGIES, &candidates) else {
        warn!(
            order_id = line.order_id,
            line_no = line.line_no,
            product_id = line.product_id,
            "No branch stocks this product; restoration skipped"
        );
        return Ok(None);
    };

    inventory::credit(
        conn,
        line.product_id,
        branch_id,
        line.quantity,
        StockMovement::Restoration,
    )
    .await?;

    Ok(Some(branch_id))
}

/// Undoes a live order: restocks its lines, settles its returns and deletes
/// its sales. The caller writes the new status.
///
/// Lines whose return is already completed were restocked by the return
/// workflow and are skipped.
pub(crate) async fn reverse_order(
    conn: &mut SqliteConnection,
    order: &Order,
    record_returns: bool,
    now: DateTime<Utc>,
) -> EngineResult<()> {
    let lines = orders::lines(conn, order.id).await?;
    let sale_branches = sales::branches_for_order(conn, order.id).await?;
    let existing = returns::for_order(conn, order.id).await?;

    for line in &lines {
        let restored_by_return = existing
            .iter()
            .any(|record| record.line_no == line.line_no && record.is_completed());

        if restored_by_return {
            debug!(order_id = order.id, line_no = line.line_no, "Line already restored by return");
            continue;
        }

        restore_line(conn, line, &sale_branches).await?;
    }

    if record_returns {
        if existing.is_empty() {
            for line in &lines {
                returns::insert(conn, line, ADMIN_RETURN_REASON, ReturnStatus::Completed, now).await?;
            }
            debug!(order_id = order.id, lines = lines.len(), "Admin return rows recorded");
        } else {
            let promoted = returns::complete_open(conn, order.id, now).await?;
            debug!(order_id = order.id, promoted, "Open return rows completed");
        }
    }

    sales::delete_for_order(conn, order.id).await?;
    Ok(())
}
