//! # Branch Allocation
//!
//! Decides which branch a reservation debits and which branch a compensation
//! credits. The store layer loads the candidate rows inside its write
//! transaction and hands them here; nothing in this module touches the store.
//!
//! ## Reservation
//! ```text
//! product 7, qty 3
//!   branch 1: 4   ─┐
//!   branch 2: 9   ─┼─► deepest = branch 2 (ties → lowest branch id)
//!   branch 3: 9   ─┘        │
//!                           ▼
//!                  9 >= 3 ? debit to 6 : OutOfStock
//! ```
//! A line is never split across branches, so only the deepest branch is
//! considered.
//!
//! ## Restoration
//! Strategies are tried in order until one yields a branch:
//! 1. [`RestoreStrategy::SaleBranch`]: a branch recorded on the order's sales
//!    that stocks the product
//! 2. [`RestoreStrategy::AnyStockingBranch`]: any branch stocking the product,
//!    lowest id first
//!
//! When none applies the line is skipped and the caller logs a warning.

use crate::error::{CoreError, CoreResult};
use crate::types::{BranchId, InventoryRow};

// =============================================================================
// Reservation
// =============================================================================

/// Outcome of a successful reservation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub branch_id: BranchId,
    pub old_quantity: i64,
    pub new_quantity: i64,
}

/// Returns the row with the highest quantity, lowest branch id on ties.
pub fn deepest_branch(rows: &[InventoryRow]) -> Option<&InventoryRow> {
    rows.iter()
        .max_by(|a, b| a.quantity.cmp(&b.quantity).then(b.branch_id.cmp(&a.branch_id)))
}

/// Picks the branch for one order line and checks it can cover `quantity`.
///
/// `product_name` only feeds the error message.
pub fn plan_reservation(
    product_name: &str,
    rows: &[InventoryRow],
    quantity: i64,
) -> CoreResult<Reservation> {
    match deepest_branch(rows) {
        Some(row) if row.quantity >= quantity => Ok(Reservation {
            branch_id: row.branch_id,
            old_quantity: row.quantity,
            new_quantity: row.quantity - quantity,
        }),
        _ => Err(CoreError::OutOfStock {
            product: product_name.to_string(),
        }),
    }
}

/// Checks that a specific branch row can give up `quantity` units.
///
/// A missing row counts as zero stock.
pub fn plan_debit(
    product_name: &str,
    branch_id: BranchId,
    available: Option<i64>,
    quantity: i64,
) -> CoreResult<i64> {
    let available = available.unwrap_or(0);
    if available < quantity {
        return Err(CoreError::InsufficientStock {
            product: product_name.to_string(),
            branch_id,
            available,
            requested: quantity,
        });
    }
    Ok(available - quantity)
}

// =============================================================================
// Restoration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStrategy {
    /// Branch recorded on the order's sale rows, if it stocks the product.
    SaleBranch,
    /// Lowest-id branch holding an inventory row for the product.
    AnyStockingBranch,
}

/// Default restoration order.
pub const RESTORE_STRATEGIES: [RestoreStrategy; 2] =
    [RestoreStrategy::SaleBranch, RestoreStrategy::AnyStockingBranch];

/// Facts about one order line gathered by the store layer.
#[derive(Debug, Clone, Default)]
pub struct RestoreCandidates {
    /// Non-null branch ids on the order's sale rows.
    pub sale_branches: Vec<BranchId>,
    /// Branches with an inventory row for the line's product.
    pub stocking_branches: Vec<BranchId>,
}

impl RestoreStrategy {
    fn pick(&self, candidates: &RestoreCandidates) -> Option<BranchId> {
        match self {
            RestoreStrategy::SaleBranch => candidates
                .sale_branches
                .iter()
                .copied()
                .filter(|branch| candidates.stocking_branches.contains(branch))
                .min(),
            RestoreStrategy::AnyStockingBranch => candidates.stocking_branches.iter().copied().min(),
        }
    }
}

/// Walks `strategies` in order and returns the first branch any of them picks.
pub fn choose_restore_branch(
    strategies: &[RestoreStrategy],
    candidates: &RestoreCandidates,
) -> Option<BranchId> {
    strategies.iter().find_map(|strategy| strategy.pick(candidates))
}

// =============================================================================
// Unit Tests
// =============================================================================
