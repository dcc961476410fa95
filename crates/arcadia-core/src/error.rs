//! # Error Types
//!
//! Domain-specific error types for arcadia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  arcadia-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  arcadia-db errors                                                     │
//! │  ├── DbError          - Store failures                                 │
//! │  └── EngineError      - CoreError | DbError from a service call        │
//! │                                                                         │
//! │  arcadia-api errors                                                    │
//! │  └── ApiError         - What HTTP clients see                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::status::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// Every variant is caller-correctable or a missing reference; store failures
/// live in `arcadia-db`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Return not found: {0}")]
    ReturnNotFound(i64),

    #[error("Branch not found: {0}")]
    BranchNotFound(i64),

    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    #[error("Supplier not found: {0}")]
    SupplierNotFound(i64),

    /// No single branch holds enough stock for an order line.
    ///
    /// ## User Workflow
    /// ```text
    /// createOrder(items: [{ product: "Halo Infinite", qty: 3 }])
    ///      │
    ///      ▼
    /// deepest branch holds 2
    ///      │
    ///      ▼
    /// OutOfStock { product: "Halo Infinite" }
    ///      │
    ///      ▼
    /// Client shows: "Out of Stock: Halo Infinite"
    /// ```
    #[error("Out of Stock: {product}")]
    OutOfStock { product: String },

    /// A specific branch cannot cover a transfer or in-store sale.
    #[error("Insufficient stock for {product} at branch {branch_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        branch_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Return request already pending or processed for order {0}")]
    ReturnAlreadyRequested(i64),

    /// Completed returns have already restocked their line.
    #[error("Return {0} is already completed")]
    ReturnAlreadyCompleted(i64),

    #[error("Order {0} has no lines")]
    OrderHasNoLines(i64),

    #[error("Order {order_id} is {status} and cannot be returned")]
    OrderNotReturnable { order_id: i64, status: OrderStatus },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true when a referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ProductNotFound(_)
                | CoreError::OrderNotFound(_)
                | CoreError::ReturnNotFound(_)
                | CoreError::BranchNotFound(_)
                | CoreError::CustomerNotFound(_)
                | CoreError::SupplierNotFound(_)
        )
    }

    /// Returns true for rejections that carry stock information.
    pub fn is_stock_error(&self) -> bool {
        matches!(
            self,
            CoreError::OutOfStock { .. } | CoreError::InsufficientStock { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store access.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value inside one request (e.g. two lines sharing a line number).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// Two fields that must differ are equal.
    #[error("{first} and {second} must be different")]
    MustDiffer { first: String, second: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
