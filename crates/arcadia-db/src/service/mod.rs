//! # Fulfillment Services
//!
//! Each public method is one operation: it validates its input, opens one
//! `BEGIN IMMEDIATE` transaction, asks `arcadia-core` what to do, runs the
//! repository calls and commits. Any error drops the transaction, which rolls
//! every statement back.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderService   create_order · get_order · update_status               │
//! │  ReturnService  request_return · update_return_status · list_returns   │
//! │  StockService   restock · transfer · record_offline_sale               │
//! │                 inventory_for · recent_stock_logs                      │
//! │                                                                         │
//! │  compensation   restore_line · reverse_order (shared by the first two) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use arcadia_core::{CostRatio, IN_STORE_COST_RATIO, ONLINE_COST_RATIO};

mod compensation;
pub mod orders;
pub mod returns;
pub mod stock;

pub use orders::OrderService;
pub use returns::ReturnService;
pub use stock::{StockService, TransferOutcome};

/// Settings shared by the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cost recognised on an online sale, as a share of the order total.
    pub online_cost_ratio: CostRatio,
    /// Cost recognised on a walk-in sale.
    pub in_store_cost_ratio: CostRatio,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            online_cost_ratio: ONLINE_COST_RATIO,
            in_store_cost_ratio: IN_STORE_COST_RATIO,
        }
    }
}
