use arcadia_core::{ReturnId, ReturnRecord, ReturnRequest, ReturnStatus};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};

use super::orders::StatusBody;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/returns", post(request_return))
        .route("/api/admin/returns/{id}/status", put(update_return_status))
}

async fn request_return(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReturnRequest>,
) -> ApiResult<(StatusCode, Json<Vec<ReturnRecord>>)> {
    let records = state.db.returns().request_return(&body).await?;
    Ok((StatusCode::CREATED, Json(records)))
}

async fn update_return_status(
    State(state): State<AppState>,
    Path(id): Path<ReturnId>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<ReturnRecord>> {
    let target: ReturnStatus = body.status.parse()?;
    Ok(Json(state.db.returns().update_return_status(id, target).await?))
}
