use axum::Router;

use crate::AppState;

pub mod admin;
pub mod health;
pub mod orders;
pub mod returns;

/// Every route, without middleware or state.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .merge(returns::router())
        .merge(admin::router())
        .merge(health::router())
}
