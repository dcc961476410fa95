//! Restock, transfer and in-store sale operations.

mod common;

use arcadia_core::{
    CoreError, OfflineSaleRequest, OrderStatus, PaymentStatus, RestockRequest, SaleType,
    StockMovement, TransferRequest, IN_STORE_COST_RATIO, IN_STORE_PAYMENT_METHOD, IN_STORE_PICKUP,
};
use arcadia_db::repository::{catalog, inventory, purchases, sales};
use arcadia_db::{EngineError, TransferOutcome};
use common::{fixture, CONSOLE_PRICE};

fn rule(err: EngineError) -> CoreError {
    match err {
        EngineError::Rule(rule) => rule,
        EngineError::Store(store) => panic!("expected a rule error, got {store}"),
    }
}

#[tokio::test]
async fn restock_creates_row_and_pending_purchase() {
    let fx = fixture().await;
    let branch = fx.branches[1];

    let request = RestockRequest {
        product_id: fx.console,
        branch_id: branch,
        supplier_id: fx.supplier,
        quantity: 12,
        unit_cost_cents: 38000,
    };
    assert_eq!(fx.db.stock().restock(&request).await.unwrap(), 12);
    assert_eq!(fx.db.stock().restock(&request).await.unwrap(), 24);

    let mut conn = fx.db.pool().acquire().await.unwrap();
    let recorded = purchases::for_product(&mut conn, fx.console).await.unwrap();
    drop(conn);
    assert_eq!(recorded.len(), 2);
    assert!(recorded.iter().all(|p| p.payment_status == PaymentStatus::Pending));
    assert_eq!(recorded[0].total_cost().cents(), 12 * 38000);

    let logs = fx.db.stock().recent_stock_logs(None).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].reason, StockMovement::Restock);
    assert_eq!((logs[0].old_quantity, logs[0].new_quantity), (12, 24));
    assert_eq!((logs[1].old_quantity, logs[1].new_quantity), (0, 12));
}

#[tokio::test]
async fn restock_rejects_bad_input_and_unknown_references() {
    let fx = fixture().await;
    let stock = fx.db.stock();
    let mut request = RestockRequest {
        product_id: fx.game,
        branch_id: fx.branches[0],
        supplier_id: fx.supplier,
        quantity: 0,
        unit_cost_cents: 100,
    };
    assert!(matches!(
        rule(stock.restock(&request).await.unwrap_err()),
        CoreError::Validation(_)
    ));

    request.quantity = 5;
    request.supplier_id = 321;
    assert!(matches!(
        rule(stock.restock(&request).await.unwrap_err()),
        CoreError::SupplierNotFound(321)
    ));

    request.supplier_id = fx.supplier;
    request.branch_id = 654;
    assert!(matches!(
        rule(stock.restock(&request).await.unwrap_err()),
        CoreError::BranchNotFound(654)
    ));

    assert_eq!(fx.count("SELECT COUNT(*) FROM purchases").await, 0);
    assert_eq!(fx.count("SELECT COUNT(*) FROM inventory").await, 0);
}

#[tokio::test]
async fn transfer_moves_whole_stock_and_creates_destination() {
    let fx = fixture().await;
    let [a, b, _] = fx.branches;
    fx.stock(fx.game, a, 10).await;
    assert_eq!(fx.quantity(fx.game, b).await, None);

    let outcome = fx
        .db
        .stock()
        .transfer(&TransferRequest {
            product_id: fx.game,
            from_branch_id: a,
            to_branch_id: b,
            quantity: 10,
        })
        .await
        .unwrap();

    assert_eq!(
        outcome,
        TransferOutcome {
            from_quantity: 0,
            to_quantity: 10
        }
    );
    assert_eq!(fx.quantity(fx.game, a).await, Some(0));
    assert_eq!(fx.quantity(fx.game, b).await, Some(10));

    let logs = fx.db.stock().recent_stock_logs(Some(2)).await.unwrap();
    assert_eq!(logs[0].reason, StockMovement::TransferIn);
    assert_eq!(logs[1].reason, StockMovement::TransferOut);
}

#[tokio::test]
async fn transfer_rejections_leave_stock_untouched() {
    let fx = fixture().await;
    let [a, b, c] = fx.branches;
    fx.stock(fx.game, a, 4).await;
    let stock = fx.db.stock();

    let same_branch = TransferRequest {
        product_id: fx.game,
        from_branch_id: a,
        to_branch_id: a,
        quantity: 1,
    };
    assert!(matches!(
        rule(stock.transfer(&same_branch).await.unwrap_err()),
        CoreError::Validation(_)
    ));

    let too_many = TransferRequest {
        product_id: fx.game,
        from_branch_id: a,
        to_branch_id: b,
        quantity: 5,
    };
    assert!(matches!(
        rule(stock.transfer(&too_many).await.unwrap_err()),
        CoreError::InsufficientStock {
            available: 4,
            requested: 5,
            ..
        }
    ));

    let missing_source = TransferRequest {
        product_id: fx.game,
        from_branch_id: c,
        to_branch_id: b,
        quantity: 1,
    };
    assert!(matches!(
        rule(stock.transfer(&missing_source).await.unwrap_err()),
        CoreError::InsufficientStock { available: 0, .. }
    ));

    assert_eq!(fx.quantity(fx.game, a).await, Some(4));
    assert_eq!(fx.quantity(fx.game, b).await, None);
}

#[tokio::test]
async fn ledger_adjust_debits_one_branch_and_credits_missing_rows() {
    let fx = fixture().await;
    let [a, b, _] = fx.branches;
    fx.stock(fx.game, a, 3).await;
    let logs_before = fx.count("SELECT COUNT(*) FROM stock_logs").await;

    // The in-memory pool holds a single connection; release it before the
    // fixture helpers run.
    {
        let mut conn = fx.db.pool().acquire().await.unwrap();
        let product = catalog::product(&mut conn, fx.game).await.unwrap().unwrap();

        let err = inventory::adjust(&mut conn, &product, a, -4, StockMovement::TransferOut)
            .await
            .unwrap_err();
        assert!(matches!(
            rule(err),
            CoreError::InsufficientStock {
                branch_id,
                available: 3,
                requested: 4,
                ..
            } if branch_id == a
        ));

        let left = inventory::adjust(&mut conn, &product, a, -3, StockMovement::TransferOut)
            .await
            .unwrap();
        assert_eq!(left, 0);

        let credited = inventory::adjust(&mut conn, &product, b, 2, StockMovement::TransferIn)
            .await
            .unwrap();
        assert_eq!(credited, 2);
    }

    assert_eq!(fx.quantity(fx.game, a).await, Some(0));
    assert_eq!(fx.quantity(fx.game, b).await, Some(2));
    // The rejected debit wrote nothing.
    assert_eq!(fx.count("SELECT COUNT(*) FROM stock_logs").await, logs_before + 2);
}

#[tokio::test]
async fn offline_sale_records_delivered_paid_order() {
    let fx = fixture().await;
    let branch = fx.branches[2];
    fx.stock(fx.console, branch, 3).await;

    let order_id = fx
        .db
        .stock()
        .record_offline_sale(&OfflineSaleRequest {
            product_id: fx.console,
            branch_id: branch,
            quantity: 2,
        })
        .await
        .unwrap();

    assert_eq!(fx.quantity(fx.console, branch).await, Some(1));

    let view = fx.db.orders().get_order(order_id).await.unwrap();
    assert_eq!(view.order.status, OrderStatus::Delivered);
    assert_eq!(view.order.payment_status, PaymentStatus::Paid);
    assert_eq!(view.order.delivery_address, IN_STORE_PICKUP);
    assert_eq!(view.order.payment_method.as_deref(), Some(IN_STORE_PAYMENT_METHOD));
    assert_eq!(view.order.customer_id, Some(fx.customer));
    assert!(view.order.actual_delivery_date.is_some());
    assert_eq!(view.order.total_amount_cents, CONSOLE_PRICE * 2);
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].unit_price_cents, CONSOLE_PRICE);

    let mut conn = fx.db.pool().acquire().await.unwrap();
    let recorded = sales::for_order(&mut conn, order_id).await.unwrap();
    drop(conn);
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].sale_type, SaleType::InStore);
    assert_eq!(recorded[0].branch_id, Some(branch));
    assert_eq!(
        recorded[0].cost_cents,
        recorded[0].transaction_amount().apply_ratio(IN_STORE_COST_RATIO).cents()
    );
}

#[tokio::test]
async fn returning_offline_sale_restocks_selling_branch() {
    let fx = fixture().await;
    let [a, _, c] = fx.branches;
    fx.stock(fx.game, a, 9).await;
    fx.stock(fx.game, c, 2).await;

    let order_id = fx
        .db
        .stock()
        .record_offline_sale(&OfflineSaleRequest {
            product_id: fx.game,
            branch_id: c,
            quantity: 2,
        })
        .await
        .unwrap();
    assert_eq!(fx.quantity(fx.game, c).await, Some(0));

    fx.db.orders().update_status(order_id, OrderStatus::Returned).await.unwrap();

    assert_eq!(fx.quantity(fx.game, c).await, Some(2));
    assert_eq!(fx.quantity(fx.game, a).await, Some(9));
}

#[tokio::test]
async fn offline_sale_without_stock_fails() {
    let fx = fixture().await;
    let err = rule(
        fx.db
            .stock()
            .record_offline_sale(&OfflineSaleRequest {
                product_id: fx.game,
                branch_id: fx.branches[0],
                quantity: 1,
            })
            .await
            .unwrap_err(),
    );
    assert!(err.is_stock_error());
    assert_eq!(fx.count("SELECT COUNT(*) FROM orders").await, 0);
}

#[tokio::test]
async fn inventory_for_lists_rows_by_branch() {
    let fx = fixture().await;
    fx.stock(fx.game, fx.branches[2], 1).await;
    fx.stock(fx.game, fx.branches[0], 6).await;

    let rows = fx.db.stock().inventory_for(fx.game).await.unwrap();
    let branches: Vec<i64> = rows.iter().map(|row| row.branch_id).collect();
    assert_eq!(branches, vec![fx.branches[0], fx.branches[2]]);
    assert!(rows.iter().all(|row| row.quantity >= 0));

    assert!(matches!(
        rule(fx.db.stock().inventory_for(31337).await.unwrap_err()),
        CoreError::ProductNotFound(31337)
    ));
}
