//! # Order & Return Status Machines
//!
//! Closed enumerations for every status field plus the transition rules that
//! decide which side effects a status change carries.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   pending ──► processing ──► shipped ──► delivered                      │
//! │      │            │             │            │                          │
//! │      └────────────┴──────┬──────┴────────────┘                          │
//! │                          ▼                                              │
//! │               cancelled ◄──► returned      (terminal)                   │
//! │                                                                         │
//! │  • forward moves may skip steps (pending → shipped)                     │
//! │  • backward moves along the chain are rejected                          │
//! │  • entering a terminal state from a live one compensates:               │
//! │      restock lines, reverse revenue, (returned) complete returns        │
//! │  • terminal ↔ terminal only relabels: never compensates twice           │
//! │  • re-issuing the current status is a no-op                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Order Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }

    /// Cancelled and returned orders have had their stock restored and their
    /// revenue reversed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Returned)
    }

    /// Position along the fulfilment chain; `None` for terminal states.
    fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Processing => Some(1),
            OrderStatus::Shipped => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled | OrderStatus::Returned => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Transition Plan
// =============================================================================

/// What a status change must do besides writing the new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Target equals the current status: write nothing.
    Unchanged,
    /// Plain status update.
    StatusOnly,
    /// Shipping without a tracking number: issue one.
    IssueTracking,
    /// Stamp `actual_delivery_date`.
    StampDelivery,
    /// Restore stock, reverse revenue and, for returns, complete Return rows.
    Compensate { record_returns: bool },
}

/// A validated order status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub effect: SideEffect,
}

impl TransitionPlan {
    /// Validates `from → to` and picks its side effect.
    ///
    /// `has_tracking` tells whether the order already carries a tracking
    /// number; re-shipping never replaces an issued number.
    pub fn new(from: OrderStatus, has_tracking: bool, to: OrderStatus) -> CoreResult<Self> {
        let effect = if from == to {
            SideEffect::Unchanged
        } else {
            match (from.rank(), to.rank()) {
                // Live → live: forward only.
                (Some(current), Some(target)) if target > current => match to {
                    OrderStatus::Shipped if !has_tracking => SideEffect::IssueTracking,
                    OrderStatus::Delivered => SideEffect::StampDelivery,
                    _ => SideEffect::StatusOnly,
                },
                (Some(_), Some(_)) => return Err(CoreError::InvalidTransition { from, to }),
                // Live → terminal: compensate exactly once.
                (Some(_), None) => SideEffect::Compensate {
                    record_returns: to == OrderStatus::Returned,
                },
                // Terminal → terminal: relabel only.
                (None, None) => SideEffect::StatusOnly,
                // Terminal → live would resurrect an order whose stock is gone.
                (None, Some(_)) => return Err(CoreError::InvalidTransition { from, to }),
            }
        };

        Ok(TransitionPlan { from, to, effect })
    }

    /// Payment status implied by the target, if it changes one.
    pub fn payment_status(&self) -> Option<PaymentStatus> {
        match (self.effect, self.to) {
            (SideEffect::Compensate { .. }, OrderStatus::Returned) => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Return Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl ReturnStatus {
    pub const ALL: [ReturnStatus; 4] = [
        ReturnStatus::Pending,
        ReturnStatus::Approved,
        ReturnStatus::Rejected,
        ReturnStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Pending => "pending",
            ReturnStatus::Approved => "approved",
            ReturnStatus::Rejected => "rejected",
            ReturnStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReturnStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ReturnStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

/// What a return status change must do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnEffect {
    /// Same status: write nothing.
    Unchanged,
    /// First completion: stamp refund date, restock the line, re-evaluate the order.
    Complete,
    /// Back to pending: clear the refund date.
    Reopen,
    /// approved / rejected.
    StatusOnly,
}

/// Decides the effect of moving a Return row from `from` to `to`.
///
/// A completed row has already restocked its line, so it cannot be moved
/// again; this keeps restoration at most once per row.
pub fn plan_return_change(
    return_id: i64,
    from: ReturnStatus,
    to: ReturnStatus,
) -> CoreResult<ReturnEffect> {
    if from == to {
        return Ok(ReturnEffect::Unchanged);
    }
    if from == ReturnStatus::Completed {
        return Err(CoreError::ReturnAlreadyCompleted(return_id));
    }

    Ok(match to {
        ReturnStatus::Completed => ReturnEffect::Complete,
        ReturnStatus::Pending => ReturnEffect::Reopen,
        ReturnStatus::Approved | ReturnStatus::Rejected => ReturnEffect::StatusOnly,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(from: OrderStatus, to: OrderStatus) -> CoreResult<TransitionPlan> {
        TransitionPlan::new(from, false, to)
    }

    #[test]
    fn test_same_status_is_noop() {
        for status in OrderStatus::ALL {
            assert_eq!(plan(status, status).unwrap().effect, SideEffect::Unchanged);
        }
    }

    #[test]
    fn test_shipping_issues_tracking_once() {
        let first = TransitionPlan::new(OrderStatus::Processing, false, OrderStatus::Shipped).unwrap();
        assert_eq!(first.effect, SideEffect::IssueTracking);

        let again = TransitionPlan::new(OrderStatus::Pending, true, OrderStatus::Shipped).unwrap();
        assert_eq!(again.effect, SideEffect::StatusOnly);
    }

    #[test]
    fn test_forward_moves_may_skip() {
        assert_eq!(
            plan(OrderStatus::Pending, OrderStatus::Delivered).unwrap().effect,
            SideEffect::StampDelivery
        );
        assert_eq!(
            plan(OrderStatus::Pending, OrderStatus::Processing).unwrap().effect,
            SideEffect::StatusOnly
        );
    }

    #[test]
    fn test_backward_moves_rejected() {
        let err = plan(OrderStatus::Shipped, OrderStatus::Processing).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert!(plan(OrderStatus::Delivered, OrderStatus::Pending).is_err());
    }

    #[test]
    fn test_entering_terminal_compensates() {
        assert_eq!(
            plan(OrderStatus::Pending, OrderStatus::Cancelled).unwrap().effect,
            SideEffect::Compensate { record_returns: false }
        );
        let returned = plan(OrderStatus::Delivered, OrderStatus::Returned).unwrap();
        assert_eq!(returned.effect, SideEffect::Compensate { record_returns: true });
        assert_eq!(returned.payment_status(), Some(PaymentStatus::Refunded));
    }

    #[test]
    fn test_terminal_to_terminal_never_compensates() {
        let relabel = plan(OrderStatus::Cancelled, OrderStatus::Returned).unwrap();
        assert_eq!(relabel.effect, SideEffect::StatusOnly);
        assert_eq!(relabel.payment_status(), None);
    }

    #[test]
    fn test_terminal_cannot_reenter_chain() {
        assert!(plan(OrderStatus::Cancelled, OrderStatus::Pending).is_err());
        assert!(plan(OrderStatus::Returned, OrderStatus::Shipped).is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!("completed".parse::<ReturnStatus>().unwrap(), ReturnStatus::Completed);
        assert!("refunded".parse::<ReturnStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_return_completion_is_once() {
        assert_eq!(
            plan_return_change(1, ReturnStatus::Approved, ReturnStatus::Completed).unwrap(),
            ReturnEffect::Complete
        );
        assert_eq!(
            plan_return_change(1, ReturnStatus::Completed, ReturnStatus::Completed).unwrap(),
            ReturnEffect::Unchanged
        );
        assert!(matches!(
            plan_return_change(1, ReturnStatus::Completed, ReturnStatus::Pending),
            Err(CoreError::ReturnAlreadyCompleted(1))
        ));
    }

    #[test]
    fn test_return_reopen_and_relabel() {
        assert_eq!(
            plan_return_change(7, ReturnStatus::Rejected, ReturnStatus::Pending).unwrap(),
            ReturnEffect::Reopen
        );
        assert_eq!(
            plan_return_change(7, ReturnStatus::Pending, ReturnStatus::Approved).unwrap(),
            ReturnEffect::StatusOnly
        );
    }
}
