//! Customer-facing order routes.

use arcadia_core::{NewOrder, Order, OrderId, OrderStatus, OrderWithLines, ReturnRecord};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: OrderId,
}

/// Status strings are parsed after extraction so an unknown value reports the
/// allowed set.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/status", put(update_status))
        .route("/api/orders/{id}/returns", get(list_returns))
}

async fn create_order(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewOrder>,
) -> ApiResult<(StatusCode, Json<OrderCreated>)> {
    let order_id = state.db.orders().create_order(&body).await?;
    Ok((StatusCode::CREATED, Json(OrderCreated { order_id })))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<Json<OrderWithLines>> {
    Ok(Json(state.db.orders().get_order(id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<Order>> {
    let target: OrderStatus = body.status.parse()?;
    Ok(Json(state.db.orders().update_status(id, target).await?))
}

async fn list_returns(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<Json<Vec<ReturnRecord>>> {
    Ok(Json(state.db.returns().list_returns(id).await?))
}
