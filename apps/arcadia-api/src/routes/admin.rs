//! Back-office stock routes.

use arcadia_core::{
    InventoryRow, OfflineSaleRequest, OrderId, ProductId, RestockRequest, StockLog,
    TransferRequest,
};
use arcadia_db::TransferOutcome;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::orders::OrderCreated;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restocked {
    pub new_quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub limit: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/restock", post(restock))
        .route("/api/admin/inventory/transfer", post(transfer))
        .route("/api/admin/inventory/{product_id}", get(inventory))
        .route("/api/admin/sales/offline", post(offline_sale))
        .route("/api/admin/stock-logs", get(stock_logs))
}

async fn restock(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RestockRequest>,
) -> ApiResult<Json<Restocked>> {
    let new_quantity = state.db.stock().restock(&body).await?;
    Ok(Json(Restocked { new_quantity }))
}

async fn transfer(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TransferRequest>,
) -> ApiResult<Json<TransferOutcome>> {
    Ok(Json(state.db.stock().transfer(&body).await?))
}

async fn inventory(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> ApiResult<Json<Vec<InventoryRow>>> {
    Ok(Json(state.db.stock().inventory_for(product_id).await?))
}

async fn offline_sale(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OfflineSaleRequest>,
) -> ApiResult<(StatusCode, Json<OrderCreated>)> {
    let order_id: OrderId = state.db.stock().record_offline_sale(&body).await?;
    Ok((StatusCode::CREATED, Json(OrderCreated { order_id })))
}

async fn stock_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> ApiResult<Json<Vec<StockLog>>> {
    Ok(Json(state.db.stock().recent_stock_logs(query.limit).await?))
}
