//! Error types for the HTTP surface.
//!
//! Business rejections pass through with their message; store failures are
//! logged here and reach the client as an opaque 500.

use arcadia_core::{CoreError, ValidationError};
use arcadia_db::EngineError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// What a client sees when a request fails.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { code, .. } => code,
            ApiError::NotFound(_) => "not_found",
            ApiError::Internal => "internal_error",
        }
    }

    fn bad_request(code: &'static str, err: impl ToString) -> Self {
        ApiError::BadRequest {
            code,
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_not_found() {
            return ApiError::NotFound(err.to_string());
        }
        let code = match &err {
            CoreError::OutOfStock { .. } => "out_of_stock",
            CoreError::InsufficientStock { .. } => "insufficient_stock",
            CoreError::InvalidTransition { .. } => "invalid_transition",
            CoreError::ReturnAlreadyRequested(_) => "return_exists",
            CoreError::ReturnAlreadyCompleted(_) => "return_completed",
            CoreError::OrderHasNoLines(_) => "order_has_no_lines",
            CoreError::OrderNotReturnable { .. } => "order_not_returnable",
            _ => "validation_error",
        };
        ApiError::bad_request(code, err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request("validation_error", err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("validation_error", rejection.body_text())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Rule(rule) => rule.into(),
            EngineError::Store(store) => {
                tracing::error!(error = %store, "Store failure while handling request");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::OrderStatus;
    use arcadia_db::DbError;

    #[test]
    fn test_rule_errors_map_to_400() {
        let err: ApiError = CoreError::OutOfStock {
            product: "Halo Infinite".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "out_of_stock");
        assert_eq!(err.to_string(), "Out of Stock: Halo Infinite");

        let err: ApiError = CoreError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        }
        .into();
        assert_eq!(err.code(), "invalid_transition");
    }

    #[test]
    fn test_missing_references_map_to_404() {
        let err: ApiError = EngineError::Rule(CoreError::OrderNotFound(7)).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_body_rejections_are_validation_errors() {
        let err: ApiError = JsonRejection::from(
            axum::extract::rejection::MissingJsonContentType::default(),
        )
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn test_store_failures_are_opaque() {
        let err: ApiError = EngineError::Store(DbError::QueryFailed("disk I/O error".into())).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
