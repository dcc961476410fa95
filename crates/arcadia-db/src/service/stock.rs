//! # Stock Movement Service
//!
//! Supplier restocks, branch-to-branch transfers and walk-in sales, plus the
//! inventory reads the admin screens use.
//!
//! ## Movements and Their Log Reasons
//! ```text
//! restock(P, B, n)           B: +n                 restock
//! transfer(P, A → B, n)      A: -n  B: +n          transfer_out / transfer_in
//! recordOfflineSale(P, B, n) B: -n                 in_store_sale
//! ```

use chrono::Utc;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, instrument};

use arcadia_core::{
    BranchId, CoreError, InventoryRow, Money, OfflineSaleRequest, OrderId, Product, ProductId,
    RestockRequest, SaleType, StockLog, StockMovement, TransferRequest, ValidationError,
};

use crate::error::EngineResult;
use crate::pool::begin_write;
use crate::repository::sales::NewSale;
use crate::repository::{catalog, inventory, orders, purchases, sales};
use crate::service::EngineConfig;

/// Default number of rows returned by `recent_stock_logs`.
pub const DEFAULT_STOCK_LOG_LIMIT: u32 = 50;

/// Quantities on both sides after a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferOutcome {
    pub from_quantity: i64,
    pub to_quantity: i64,
}

#[derive(Debug, Clone)]
pub struct StockService {
    pool: SqlitePool,
    config: EngineConfig,
}

impl StockService {
    pub fn new(pool: SqlitePool, config: EngineConfig) -> Self {
        StockService { pool, config }
    }

    /// Records a supplier purchase and credits the branch. Returns the new quantity.
    #[instrument(skip(self, request), fields(product_id = request.product_id, branch_id = request.branch_id))]
    pub async fn restock(&self, request: &RestockRequest) -> EngineResult<i64> {
        request.validate()?;

        let mut tx = begin_write(&self.pool).await?;

        require_product(&mut tx, request.product_id).await?;
        require_branch(&mut tx, request.branch_id).await?;
        if !catalog::supplier_exists(&mut tx, request.supplier_id).await? {
            return Err(CoreError::SupplierNotFound(request.supplier_id).into());
        }

        let purchase_id = purchases::insert(&mut tx, request, Utc::now()).await?;
        let new_quantity = inventory::credit(
            &mut tx,
            request.product_id,
            request.branch_id,
            request.quantity,
            StockMovement::Restock,
        )
        .await?;

        tx.commit().await?;

        info!(purchase_id, quantity = request.quantity, new_quantity, "Restocked");
        Ok(new_quantity)
    }

    /// Moves stock between two branches, creating the destination row if needed.
    ///
    /// Same-branch and non-positive transfers are rejected before the store
    /// is touched.
    #[instrument(skip(self, request), fields(product_id = request.product_id))]
    pub async fn transfer(&self, request: &TransferRequest) -> EngineResult<TransferOutcome> {
        request.validate()?;

        let mut tx = begin_write(&self.pool).await?;

        let product = require_product(&mut tx, request.product_id).await?;
        require_branch(&mut tx, request.to_branch_id).await?;

        let from_quantity = inventory::adjust(
            &mut tx,
            &product,
            request.from_branch_id,
            -request.quantity,
            StockMovement::TransferOut,
        )
        .await?;
        let to_quantity = inventory::credit(
            &mut tx,
            product.id,
            request.to_branch_id,
            request.quantity,
            StockMovement::TransferIn,
        )
        .await?;

        tx.commit().await?;

        info!(
            from = request.from_branch_id,
            to = request.to_branch_id,
            quantity = request.quantity,
            "Stock transferred"
        );
        Ok(TransferOutcome {
            from_quantity,
            to_quantity,
        })
    }

    /// Sells from a branch's shelf at the catalog price and records the sale
    /// as a delivered, paid order.
    #[instrument(skip(self, request), fields(product_id = request.product_id, branch_id = request.branch_id))]
    pub async fn record_offline_sale(&self, request: &OfflineSaleRequest) -> EngineResult<OrderId> {
        request.validate()?;

        let mut tx = begin_write(&self.pool).await?;

        let product = require_product(&mut tx, request.product_id).await?;
        require_branch(&mut tx, request.branch_id).await?;

        inventory::adjust(
            &mut tx,
            &product,
            request.branch_id,
            -request.quantity,
            StockMovement::InStoreSale,
        )
        .await?;

        let amount: Money = product
            .price()
            .checked_multiply_quantity(request.quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "total_amount".to_string(),
                min: 0,
                max: i64::MAX,
            })?;
        let customer_id = catalog::first_customer(&mut tx).await?;
        let now = Utc::now();

        let order_id = orders::insert_in_store(&mut tx, customer_id, amount, now).await?;
        orders::insert_detail(
            &mut tx,
            order_id,
            1,
            product.id,
            request.quantity,
            product.price_cents,
        )
        .await?;

        let sale = NewSale {
            order_id,
            branch_id: Some(request.branch_id),
            sale_type: SaleType::InStore,
            amount,
            cost: amount.apply_ratio(self.config.in_store_cost_ratio),
        };
        sales::insert(&mut tx, &sale, now).await?;

        tx.commit().await?;

        info!(order_id, amount = %amount, "In-store sale recorded");
        Ok(order_id)
    }

    /// Inventory rows of a product across branches.
    pub async fn inventory_for(&self, product_id: ProductId) -> EngineResult<Vec<InventoryRow>> {
        let mut conn = self.pool.acquire().await?;
        require_product(&mut conn, product_id).await?;
        Ok(inventory::rows_for_product(&mut conn, product_id).await?)
    }

    /// Most recent stock log rows, newest first.
    pub async fn recent_stock_logs(&self, limit: Option<u32>) -> EngineResult<Vec<StockLog>> {
        let mut conn = self.pool.acquire().await?;
        let limit = limit.unwrap_or(DEFAULT_STOCK_LOG_LIMIT).clamp(1, 500);
        Ok(inventory::recent_logs(&mut conn, limit).await?)
    }
}

async fn require_product(conn: &mut SqliteConnection, id: ProductId) -> EngineResult<Product> {
    Ok(catalog::product(conn, id)
        .await?
        .ok_or(CoreError::ProductNotFound(id))?)
}

async fn require_branch(conn: &mut SqliteConnection, id: BranchId) -> EngineResult<()> {
    if !catalog::branch_exists(conn, id).await? {
        return Err(CoreError::BranchNotFound(id).into());
    }
    Ok(())
}
