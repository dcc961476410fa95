//! Shared fixture: three branches, one customer, one supplier, a game and a
//! console, no stock.

#![allow(dead_code)]

use arcadia_core::{
    BranchId, CustomerId, NewOrder, OrderLineRequest, ProductId, ProductType, StockMovement,
    SupplierId,
};
use arcadia_db::repository::{catalog, inventory};
use arcadia_db::{Database, DbConfig};

pub const GAME_PRICE: i64 = 5999;
pub const CONSOLE_PRICE: i64 = 49999;

pub struct Fixture {
    pub db: Database,
    pub customer: CustomerId,
    pub supplier: SupplierId,
    pub branches: [BranchId; 3],
    pub game: ProductId,
    pub console: ProductId,
}

pub async fn fixture() -> Fixture {
    fixture_with(DbConfig::in_memory()).await
}

pub async fn fixture_with(config: DbConfig) -> Fixture {
    let db = Database::new(config).await.expect("database");
    let mut conn = db.pool().acquire().await.unwrap();

    let b1 = catalog::insert_branch(&mut conn, "Downtown", Some("Portland")).await.unwrap();
    let b2 = catalog::insert_branch(&mut conn, "Eastside", Some("Portland")).await.unwrap();
    let b3 = catalog::insert_branch(&mut conn, "Harbor", Some("Seattle")).await.unwrap();
    let customer = catalog::insert_customer(&mut conn, "Sam Rivera", "sam@example.com")
        .await
        .unwrap();
    let supplier = catalog::insert_supplier(&mut conn, "Pixel Distribution").await.unwrap();
    let game = catalog::insert_product(&mut conn, "Halo Infinite", ProductType::Game, GAME_PRICE)
        .await
        .unwrap();
    let console =
        catalog::insert_product(&mut conn, "PlayStation 5", ProductType::Console, CONSOLE_PRICE)
            .await
            .unwrap();
    drop(conn);

    Fixture {
        db,
        customer,
        supplier,
        branches: [b1, b2, b3],
        game,
        console,
    }
}

impl Fixture {
    /// Puts `quantity` units of a product on a branch's shelf.
    pub async fn stock(&self, product: ProductId, branch: BranchId, quantity: i64) {
        let mut conn = self.db.pool().acquire().await.unwrap();
        inventory::credit(&mut conn, product, branch, quantity, StockMovement::Restock)
            .await
            .unwrap();
    }

    pub async fn quantity(&self, product: ProductId, branch: BranchId) -> Option<i64> {
        let mut conn = self.db.pool().acquire().await.unwrap();
        inventory::quantity_at(&mut conn, product, branch).await.unwrap()
    }

    /// An order for `(product, quantity, unit price)` lines with a $5.00 fee.
    pub fn order(&self, lines: &[(ProductId, i64, i64)]) -> NewOrder {
        NewOrder {
            customer_id: self.customer,
            items: lines
                .iter()
                .enumerate()
                .map(|(i, (product_id, quantity, price))| OrderLineRequest {
                    product_id: *product_id,
                    quantity: *quantity,
                    unit_price_cents: *price,
                    line_no: i as i64 + 1,
                })
                .collect(),
            payment_method: Some("card".to_string()),
            shipping_fee_cents: 500,
            delivery_address: "12 Pixel Lane".to_string(),
            delivery_city: Some("Portland".to_string()),
            billing_address: None,
            billing_city: None,
        }
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(self.db.pool()).await.unwrap()
    }
}
