//! # Validation Module
//!
//! Input checks that run before a write transaction is opened.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum Json)                                  │
//! │  └── Shape and type checks (deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Quantities, prices, line numbers, addresses, branch pairs         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (quantity >= 0) on inventory                                │
//! │  └── UNIQUE / foreign key constraints                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use arcadia_core::validation::{validate_quantity, validate_reason};
//!
//! validate_quantity(2).unwrap();
//! assert!(validate_reason("  ").is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_ADDRESS_LEN: usize = 255;
const MAX_REASON_LEN: usize = 1000;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates the delivery address snapshot of an order.
pub fn validate_delivery_address(address: &str) -> ValidationResult<()> {
    validate_text("delivery_address", address, MAX_ADDRESS_LEN)
}

/// Validates the free-text reason of a return request.
///
/// ## Example
/// ```rust
/// use arcadia_core::validation::validate_reason;
///
/// assert!(validate_reason("Disc arrived scratched").is_ok());
/// assert!(validate_reason("").is_err());
/// ```
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    validate_text("reason", reason, MAX_REASON_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line or movement quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates an amount in cents (prices, fees, unit costs): 0..=MAX_PRICE_CENTS.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

// =============================================================================
// Order Shape
// =============================================================================

/// An order carries between 1 and MAX_ORDER_LINES lines.
pub fn validate_line_count(lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if lines > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

/// Line numbers must be positive and unique within one order.
pub fn validate_line_numbers<I>(line_numbers: I) -> ValidationResult<()>
where
    I: IntoIterator<Item = i64>,
{
    let mut seen = HashSet::new();
    for line_no in line_numbers {
        if line_no <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "line_no".to_string(),
            });
        }
        if !seen.insert(line_no) {
            return Err(ValidationError::Duplicate {
                field: "line_no".to_string(),
                value: line_no.to_string(),
            });
        }
    }
    Ok(())
}

/// Transfers need two distinct branches.
pub fn validate_branch_pair(from: i64, to: i64) -> ValidationResult<()> {
    if from == to {
        return Err(ValidationError::MustDiffer {
            first: "from_branch_id".to_string(),
            second: "to_branch_id".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
