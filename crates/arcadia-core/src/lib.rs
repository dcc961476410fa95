//! # arcadia-core: Pure Business Rules for the Fulfillment Engine
//!
//! Everything in this crate is deterministic and free of I/O. The database
//! layer (`arcadia-db`) calls into it to decide *what* should happen; it
//! never decides *how* rows are written.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Arcadia Retail Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  arcadia-api (axum handlers)                    │   │
//! │  │   POST /api/orders, PUT /api/orders/{id}/status, returns, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          arcadia-db (transactions, repositories, services)      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ asks                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ arcadia-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌──────────────┐   │   │
//! │  │   │  types   │ │  money   │ │   status   │ │  allocation  │   │   │
//! │  │   │ Order    │ │  Money   │ │ transition │ │ deepest bin, │   │   │
//! │  │   │ Return   │ │ CostRatio│ │   plans    │ │ restore plan │   │   │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Order, OrderDetail, Sale, ReturnRecord, ...) and requests
//! - [`money`] - Integer-cents money and basis-point ratios
//! - [`status`] - Order lifecycle state machine and return statuses
//! - [`allocation`] - Branch selection for reservations and restorations
//! - [`tracking`] - Carrier tracking number format
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use arcadia_core::status::{OrderStatus, SideEffect, TransitionPlan};
//!
//! let plan = TransitionPlan::new(OrderStatus::Pending, false, OrderStatus::Shipped).unwrap();
//! assert_eq!(plan.effect, SideEffect::IssueTracking);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod money;
pub mod status;
pub mod tracking;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CostRatio, Money};
pub use status::{OrderStatus, PaymentStatus, ReturnStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Estimated cost share recognised for online orders (65%).
///
/// Sales record a simulated cost, not the supplier's actual cost.
pub const ONLINE_COST_RATIO: CostRatio = CostRatio::from_bps(6500);

/// Estimated cost share recognised for in-store sales (70%).
pub const IN_STORE_COST_RATIO: CostRatio = CostRatio::from_bps(7000);

/// Delivery address stamped on orders synthesised for in-store sales.
pub const IN_STORE_PICKUP: &str = "In-Store Pickup";

/// Reason stored on Return rows synthesised by an admin-driven return.
pub const ADMIN_RETURN_REASON: &str = "Admin initiated return";

/// Payment method recorded on in-store sales.
pub const IN_STORE_PAYMENT_METHOD: &str = "in_store";

/// Upper bound for any single price, fee or unit cost ($1,000,000.00).
///
/// Keeps `quantity × price` summed over a full order far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum lines allowed in a single order.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single line or stock movement.
///
/// Guards against typing 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;
