//! Router tests driven through `tower::ServiceExt::oneshot`.

use arcadia_api::{build_app, AppState};
use arcadia_core::{ProductType, StockMovement};
use arcadia_db::repository::{catalog, inventory};
use arcadia_db::{Database, DbConfig};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    db: Database,
    customer: i64,
    supplier: i64,
    branches: [i64; 2],
    game: i64,
}

async fn test_app() -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let mut conn = db.pool().acquire().await.unwrap();
    let b1 = catalog::insert_branch(&mut conn, "Downtown", None).await.unwrap();
    let b2 = catalog::insert_branch(&mut conn, "Harbor", None).await.unwrap();
    let customer = catalog::insert_customer(&mut conn, "Ada", "ada@example.com").await.unwrap();
    let supplier = catalog::insert_supplier(&mut conn, "Pixel Distribution").await.unwrap();
    let game = catalog::insert_product(&mut conn, "Elden Ring", ProductType::Game, 4999)
        .await
        .unwrap();
    inventory::credit(&mut conn, game, b1, 5, StockMovement::Restock)
        .await
        .unwrap();
    drop(conn);

    TestApp {
        app: build_app(AppState::new(db.clone())),
        db,
        customer,
        supplier,
        branches: [b1, b2],
        game,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn order_body(&self, quantity: i64) -> Value {
        json!({
            "customerId": self.customer,
            "items": [{
                "productId": self.game,
                "quantity": quantity,
                "unitPriceCents": 4999,
                "lineNo": 1
            }],
            "paymentMethod": "card",
            "shippingFeeCents": 500,
            "deliveryAddress": "1 Main St"
        })
    }

    async fn create_order(&self, quantity: i64) -> i64 {
        let (status, body) = self
            .send(Method::POST, "/api/orders", Some(self.order_body(quantity)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["orderId"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn health_reports_database() {
    let t = test_app().await;
    let (status, body) = t.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn order_lifecycle_over_http() {
    let t = test_app().await;
    let order_id = t.create_order(2).await;

    let (status, body) = t.send(Method::GET, &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["total_amount_cents"], 4999 * 2 + 500);
    assert_eq!(body["lines"].as_array().unwrap().len(), 1);

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "shipped" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["tracking_number"].as_str().unwrap().starts_with("TR"));

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "pending" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_transition");
}

#[tokio::test]
async fn out_of_stock_is_a_bad_request() {
    let t = test_app().await;
    let (status, body) = t
        .send(Method::POST, "/api/orders", Some(t.order_body(6)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "out_of_stock");
    assert_eq!(body["message"], "Out of Stock: Elden Ring");
}

#[tokio::test]
async fn unknown_status_and_missing_order() {
    let t = test_app().await;
    let order_id = t.create_order(1).await;

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "teleported" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = t.send(Method::GET, "/api/orders/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let t = test_app().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/orders",
            Some(json!({ "items": [], "deliveryAddress": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("customerId"));

    let (status, body) = t
        .send(
            Method::POST,
            "/api/admin/restock",
            Some(json!({ "productId": t.game, "quantity": "lots" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = t.send(Method::POST, "/api/returns", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn return_flow_over_http() {
    let t = test_app().await;
    let order_id = t.create_order(1).await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/returns",
            Some(json!({ "orderId": order_id, "reason": "Disc scratched" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let return_id = body[0]["id"].as_i64().unwrap();

    let (status, body) = t
        .send(
            Method::POST,
            "/api/returns",
            Some(json!({ "orderId": order_id, "reason": "Again" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "return_exists");

    let (status, body) = t
        .send(
            Method::PUT,
            &format!("/api/admin/returns/{return_id}/status"),
            Some(json!({ "status": "completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (_, body) = t.send(Method::GET, &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(body["order"]["status"], "returned");
    assert_eq!(body["order"]["payment_status"], "refunded");

    let (status, body) = t
        .send(Method::GET, &format!("/api/orders/{order_id}/returns"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_stock_routes() {
    let t = test_app().await;
    let [b1, b2] = t.branches;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/admin/restock",
            Some(json!({
                "productId": t.game,
                "branchId": b2,
                "supplierId": t.supplier,
                "quantity": 4,
                "unitCostCents": 3000
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["newQuantity"], 4);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/admin/inventory/transfer",
            Some(json!({
                "productId": t.game,
                "fromBranchId": b1,
                "toBranchId": b1,
                "quantity": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = t
        .send(
            Method::POST,
            "/api/admin/inventory/transfer",
            Some(json!({
                "productId": t.game,
                "fromBranchId": b1,
                "toBranchId": b2,
                "quantity": 5
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromQuantity"], 0);
    assert_eq!(body["toQuantity"], 9);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/admin/sales/offline",
            Some(json!({ "productId": t.game, "branchId": b2, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["orderId"].as_i64().is_some());

    let (status, body) = t
        .send(Method::GET, "/api/admin/stock-logs?limit=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let logs = body.as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["reason"], "in_store_sale");

    let (status, body) = t
        .send(Method::GET, &format!("/api/admin/inventory/{}", t.game), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    assert!(t.db.health_check().await);
}
