//! # Order Service
//!
//! Order creation and the order status state machine.
//!
//! ## createOrder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate (no store access)                                            │
//! │       │                                                                 │
//! │  BEGIN IMMEDIATE ────────────────────────────────────────────┐         │
//! │       │                                                       │         │
//! │       ├── customer exists?                                    │         │
//! │       ├── per line: product exists? reserve from deepest bin  │ any     │
//! │       ├── INSERT orders        (pending, total incl. fee)     │ error   │
//! │       ├── INSERT order_details (caller-quoted unit prices)    │   =     │
//! │       ├── INSERT sales         (online, cost = total × 65%)   │ ROLLBACK│
//! │       └── DELETE cart_items                                   │         │
//! │       │                                                       │         │
//! │  COMMIT ◄─────────────────────────────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use arcadia_core::status::{SideEffect, TransitionPlan};
use arcadia_core::tracking::generate_tracking_number;
use arcadia_core::{CoreError, NewOrder, Order, OrderId, OrderStatus, OrderWithLines, SaleType};

use crate::error::EngineResult;
use crate::pool::begin_write;
use crate::repository::orders::StatusUpdate;
use crate::repository::sales::NewSale;
use crate::repository::{catalog, inventory, orders, sales};
use crate::service::compensation;
use crate::service::EngineConfig;

#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
    config: EngineConfig,
}

impl OrderService {
    pub fn new(pool: SqlitePool, config: EngineConfig) -> Self {
        OrderService { pool, config }
    }

    /// Reserves stock for every line and records the order, its lines and
    /// its online sale as one unit.
    ///
    /// ## Errors
    /// - `Validation`: malformed request, nothing touched
    /// - `CustomerNotFound` / `ProductNotFound`
    /// - `OutOfStock`: no single branch covers a line; names the product
    #[instrument(skip(self, order), fields(customer_id = order.customer_id, lines = order.items.len()))]
    pub async fn create_order(&self, order: &NewOrder) -> EngineResult<OrderId> {
        order.validate()?;
        let total = order.total()?;

        let mut tx = begin_write(&self.pool).await?;

        if !catalog::customer_exists(&mut tx, order.customer_id).await? {
            return Err(CoreError::CustomerNotFound(order.customer_id).into());
        }

        for item in &order.items {
            let product = catalog::product(&mut tx, item.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(item.product_id))?;
            inventory::reserve(&mut tx, &product, item.quantity).await?;
        }

        let now = Utc::now();
        let order_id = orders::insert(&mut tx, order, total, now).await?;

        for item in &order.items {
            orders::insert_line(&mut tx, order_id, item).await?;
        }

        let sale = NewSale {
            order_id,
            branch_id: None,
            sale_type: SaleType::Online,
            amount: total,
            cost: total.apply_ratio(self.config.online_cost_ratio),
        };
        sales::insert(&mut tx, &sale, now).await?;

        catalog::clear_cart(&mut tx, order.customer_id).await?;

        tx.commit().await?;

        info!(order_id, total = %total, "Order created");
        Ok(order_id)
    }

    /// Loads an order with its lines.
    pub async fn get_order(&self, order_id: OrderId) -> EngineResult<OrderWithLines> {
        let mut conn = self.pool.acquire().await?;

        let order = orders::get(&mut conn, order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;
        let lines = orders::lines(&mut conn, order_id).await?;

        Ok(OrderWithLines { order, lines })
    }

    /// Moves an order to `target` and applies the transition's side effects.
    ///
    /// Re-issuing the current status changes nothing. Entering cancelled or
    /// returned from a live state restocks the lines, deletes the order's
    /// sales and, for returned, completes its return rows and marks the
    /// payment refunded.
    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: OrderId, target: OrderStatus) -> EngineResult<Order> {
        let mut tx = begin_write(&self.pool).await?;

        let order = orders::get(&mut tx, order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;

        let plan = TransitionPlan::new(order.status, order.tracking_number.is_some(), target)?;
        let now = Utc::now();
        let mut update = StatusUpdate::to(target);
        update.payment_status = plan.payment_status();

        match plan.effect {
            SideEffect::Unchanged => return Ok(order),
            SideEffect::StatusOnly => {}
            SideEffect::IssueTracking => {
                update.tracking_number = Some(generate_tracking_number(&mut rand::thread_rng()));
            }
            SideEffect::StampDelivery => update.actual_delivery_date = Some(now),
            SideEffect::Compensate { record_returns } => {
                compensation::reverse_order(&mut tx, &order, record_returns, now).await?;
            }
        }

        orders::apply_status(&mut tx, order_id, &update, now).await?;

        let updated = orders::get(&mut tx, order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;

        tx.commit().await?;

        info!(
            order_id,
            from = %plan.from,
            to = %plan.to,
            tracking = updated.tracking_number.as_deref().unwrap_or(""),
            "Order status updated"
        );
        Ok(updated)
    }
}
