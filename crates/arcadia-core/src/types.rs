//! # Domain Types
//!
//! Records persisted by the fulfillment engine and the requests that drive it.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │──►│  OrderDetail    │◄──│  ReturnRecord   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  status         │   │  line_no        │   │  status         │       │
//! │  │  payment_status │   │  product_id     │   │  refund_amount  │       │
//! │  │  total_amount   │   │  unit_price     │   │  refund_date    │       │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │                                                             │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │  InventoryRow   │──►│    StockLog     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sale_type      │   │  (product,      │   │  old → new qty  │       │
//! │  │  amount, cost   │   │   branch) → qty │   │  reason         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are stored as `*_cents` integers and exposed as [`Money`] through
//! accessor methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::status::{OrderStatus, PaymentStatus, ReturnStatus};
use crate::validation::{
    validate_branch_pair, validate_delivery_address, validate_line_count, validate_line_numbers,
    validate_price_cents, validate_quantity, validate_reason, ValidationResult,
};

// =============================================================================
// Identifiers
// =============================================================================

pub type ProductId = i64;
pub type BranchId = i64;
pub type CustomerId = i64;
pub type SupplierId = i64;
pub type OrderId = i64;
pub type ReturnId = i64;

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Game,
    Console,
}

/// A catalog item. The engine only reads name and price.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub product_type: ProductType,
    /// Current catalog price, copied into order lines at order time.
    pub price_cents: i64,
    /// Quantity at which the admin UI flags a branch as running low.
    pub stock_alert_level: i64,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub city: Option<String>,
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock of one product at one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryRow {
    pub id: i64,
    pub product_id: ProductId,
    pub branch_id: BranchId,
    /// Never negative; enforced by the ledger and by a CHECK constraint.
    pub quantity: i64,
    pub minimum_stock: i64,
    pub maximum_stock: i64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryRow {
    /// True when the row sits at or below its minimum.
    pub fn is_low(&self) -> bool {
        self.quantity <= self.minimum_stock
    }
}

/// Why an inventory quantity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockMovement {
    /// Debited by an online order.
    Reservation,
    /// Credited back by a cancellation or a completed return.
    Restoration,
    /// Credited by a supplier purchase.
    Restock,
    TransferOut,
    TransferIn,
    /// Debited by a walk-in sale.
    InStoreSale,
}

/// Audit row appended for every quantity change.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockLog {
    pub id: i64,
    pub product_id: ProductId,
    pub branch_id: BranchId,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub reason: StockMovement,
    #[ts(as = "String")]
    pub changed_at: DateTime<Utc>,
}

impl StockLog {
    #[inline]
    pub fn delta(&self) -> i64 {
        self.new_quantity - self.old_quantity
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub total_amount_cents: i64,
    pub shipping_fee_cents: i64,
    pub delivery_address: String,
    pub delivery_city: Option<String>,
    pub billing_address: Option<String>,
    pub billing_city: Option<String>,
    /// Issued on the first move to shipped.
    pub tracking_number: Option<String>,
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub actual_delivery_date: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    #[inline]
    pub fn shipping_fee(&self) -> Money {
        Money::from_cents(self.shipping_fee_cents)
    }
}

/// One order line. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderDetail {
    pub order_id: OrderId,
    pub line_no: i64,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Price locked at order time.
    pub unit_price_cents: i64,
}

impl OrderDetail {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// An order together with its lines, as returned by `getOrder`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderDetail>,
}

// =============================================================================
// Sales Ledger
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    Online,
    InStore,
}

/// Standing revenue for one order. Deleted when the order is reversed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub order_id: OrderId,
    /// `None` for online sales.
    pub branch_id: Option<BranchId>,
    pub sale_type: SaleType,
    pub transaction_amount_cents: i64,
    pub cost_cents: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn transaction_amount(&self) -> Money {
        Money::from_cents(self.transaction_amount_cents)
    }

    /// Derived, never stored.
    #[inline]
    pub fn profit(&self) -> Money {
        Money::from_cents(self.transaction_amount_cents - self.cost_cents)
    }
}

// =============================================================================
// Returns
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReturnRecord {
    pub id: ReturnId,
    pub order_id: OrderId,
    pub line_no: i64,
    pub product_id: ProductId,
    pub quantity: i64,
    pub reason: String,
    pub status: ReturnStatus,
    /// `quantity × unit_price` of the line, fixed at request time.
    pub refund_amount_cents: i64,
    #[ts(as = "String")]
    pub requested_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub refund_date: Option<DateTime<Utc>>,
}

impl ReturnRecord {
    #[inline]
    pub fn refund_amount(&self) -> Money {
        Money::from_cents(self.refund_amount_cents)
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == ReturnStatus::Completed
    }
}

// =============================================================================
// Purchases
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Purchase {
    pub id: i64,
    pub supplier_id: SupplierId,
    pub product_id: ProductId,
    pub branch_id: BranchId,
    pub quantity: i64,
    pub unit_cost_cents: i64,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    /// Derived, never stored.
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.unit_cost_cents).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One requested order line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Caller-quoted price; locked into the line as is.
    pub unit_price_cents: i64,
    pub line_no: i64,
}

/// Input to `createOrder`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub items: Vec<OrderLineRequest>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub shipping_fee_cents: i64,
    pub delivery_address: String,
    #[serde(default)]
    pub delivery_city: Option<String>,
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub billing_city: Option<String>,
}

impl NewOrder {
    /// Checks everything that can be checked without the store.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_line_count(self.items.len())?;
        for item in &self.items {
            validate_quantity(item.quantity)?;
            validate_price_cents("unit_price", item.unit_price_cents)?;
        }
        validate_line_numbers(self.items.iter().map(|item| item.line_no))?;
        validate_price_cents("shipping_fee", self.shipping_fee_cents)?;
        validate_delivery_address(&self.delivery_address)?;
        Ok(())
    }

    /// `Σ quantity × unit_price + shipping_fee`, or an error if it leaves `i64`.
    pub fn total(&self) -> ValidationResult<Money> {
        let overflow = || ValidationError::OutOfRange {
            field: "total_amount".to_string(),
            min: 0,
            max: i64::MAX,
        };
        self.items.iter().try_fold(
            Money::from_cents(self.shipping_fee_cents),
            |acc, item| {
                Money::from_cents(item.unit_price_cents)
                    .checked_multiply_quantity(item.quantity)
                    .and_then(|line| acc.checked_add(line))
                    .ok_or_else(overflow)
            },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub order_id: OrderId,
    pub reason: String,
}

impl ReturnRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_reason(&self.reason)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    pub product_id: ProductId,
    pub branch_id: BranchId,
    pub supplier_id: SupplierId,
    pub quantity: i64,
    pub unit_cost_cents: i64,
}

impl RestockRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_quantity(self.quantity)?;
        validate_price_cents("unit_cost", self.unit_cost_cents)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub product_id: ProductId,
    pub from_branch_id: BranchId,
    pub to_branch_id: BranchId,
    pub quantity: i64,
}

impl TransferRequest {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_branch_pair(self.from_branch_id, self.to_branch_id)?;
        validate_quantity(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OfflineSaleRequest {
    pub product_id: ProductId,
    pub branch_id: BranchId,
    pub quantity: i64,
}

impl OfflineSaleRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i64, price: i64, line_no: i64) -> OrderLineRequest {
        OrderLineRequest {
            product_id,
            quantity,
            unit_price_cents: price,
            line_no,
        }
    }

    fn order(items: Vec<OrderLineRequest>) -> NewOrder {
        NewOrder {
            customer_id: 1,
            items,
            payment_method: Some("card".to_string()),
            shipping_fee_cents: 500,
            delivery_address: "12 Pixel Lane".to_string(),
            delivery_city: None,
            billing_address: None,
            billing_city: None,
        }
    }

    #[test]
    fn test_row_at_minimum_is_low() {
        let mut row = InventoryRow {
            id: 1,
            product_id: 1,
            branch_id: 2,
            quantity: 5,
            minimum_stock: 5,
            maximum_stock: 100,
            updated_at: Utc::now(),
        };
        assert!(row.is_low());
        row.quantity = 6;
        assert!(!row.is_low());
    }

    #[test]
    fn test_total_includes_shipping() {
        let new_order = order(vec![line(1, 2, 5999, 1), line(2, 1, 49999, 2)]);
        assert_eq!(new_order.total().unwrap().cents(), 5999 * 2 + 49999 + 500);
        assert!(new_order.validate().is_ok());
    }

    #[test]
    fn test_oversized_price_rejected_and_total_never_wraps() {
        let huge = order(vec![line(1, 2, i64::MAX / 2 + 1, 1)]);
        assert!(matches!(
            huge.validate(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "unit_price"
        ));
        assert!(huge.total().is_err());
    }

    #[test]
    fn test_empty_order_rejected() {
        assert!(order(vec![]).validate().is_err());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(order(vec![line(1, 0, 100, 1)]).validate().is_err());
    }

    #[test]
    fn test_duplicate_line_numbers_rejected() {
        let err = order(vec![line(1, 1, 100, 1), line(2, 1, 100, 1)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_blank_address_rejected() {
        let mut new_order = order(vec![line(1, 1, 100, 1)]);
        new_order.delivery_address = "   ".to_string();
        assert!(new_order.validate().is_err());
    }

    #[test]
    fn test_new_order_deserializes_camel_case() {
        let json = r#"{
            "customerId": 4,
            "items": [{"productId": 9, "quantity": 1, "unitPriceCents": 2999, "lineNo": 1}],
            "paymentMethod": "card",
            "deliveryAddress": "1 Main St"
        }"#;
        let parsed: NewOrder = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.shipping_fee_cents, 0);
        assert_eq!(parsed.total().unwrap().cents(), 2999);
    }

    #[test]
    fn test_sale_profit_is_derived() {
        let sale = Sale {
            id: 1,
            order_id: 1,
            branch_id: None,
            sale_type: SaleType::Online,
            transaction_amount_cents: 10000,
            cost_cents: 6500,
            sale_date: Utc::now(),
        };
        assert_eq!(sale.profit().cents(), 3500);
    }

    #[test]
    fn test_transfer_same_branch_rejected() {
        let request = TransferRequest {
            product_id: 1,
            from_branch_id: 2,
            to_branch_id: 2,
            quantity: 1,
        };
        assert!(matches!(
            request.validate(),
            Err(ValidationError::MustDiffer { .. })
        ));
    }
}
