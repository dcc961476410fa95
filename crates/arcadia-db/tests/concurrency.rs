//! Writers racing for the same stock on a file database with several connections.

mod common;

use std::time::Duration;

use arcadia_core::CoreError;
use arcadia_db::{DbConfig, EngineError};
use common::{fixture_with, GAME_PRICE};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_for_last_units_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::new(dir.path().join("race.db"))
        .max_connections(4)
        .busy_timeout(Duration::from_secs(10));
    let fx = fixture_with(config).await;
    let branch = fx.branches[0];
    fx.stock(fx.game, branch, 3).await;

    let order = fx.order(&[(fx.game, 3, GAME_PRICE)]);
    let first = tokio::spawn({
        let orders = fx.db.orders();
        let order = order.clone();
        async move { orders.create_order(&order).await }
    });
    let second = tokio::spawn({
        let orders = fx.db.orders();
        let order = order.clone();
        async move { orders.create_order(&order).await }
    });

    let results = [first.await.unwrap(), second.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let out_of_stock = results
        .iter()
        .filter(|r| matches!(r, Err(EngineError::Rule(CoreError::OutOfStock { .. }))))
        .count();

    assert_eq!(wins, 1);
    assert_eq!(out_of_stock, 1);
    assert_eq!(fx.quantity(fx.game, branch).await, Some(0));
    assert_eq!(fx.count("SELECT COUNT(*) FROM orders").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_small_orders_never_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::new(dir.path().join("oversell.db")).max_connections(5);
    let fx = fixture_with(config).await;
    let branch = fx.branches[1];
    fx.stock(fx.game, branch, 5).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let orders = fx.db.orders();
        let order = fx.order(&[(fx.game, 1, GAME_PRICE)]);
        handles.push(tokio::spawn(async move { orders.create_order(&order).await }));
    }

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            wins += 1;
        }
    }

    assert_eq!(wins, 5);
    assert_eq!(fx.quantity(fx.game, branch).await, Some(0));
    assert_eq!(
        fx.count("SELECT COUNT(*) FROM inventory WHERE quantity < 0").await,
        0
    );
}
