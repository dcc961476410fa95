//! # Arcadia API
//!
//! HTTP/JSON surface over the fulfillment engine.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Arcadia API Routes                            │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌───────────────────┐ │
//! │  │  /api/orders       │  │  /api/returns      │  │  /api/admin       │ │
//! │  │                    │  │                    │  │                   │ │
//! │  │ • POST create      │  │ • POST request     │  │ • restock         │ │
//! │  │ • GET  by id       │  │                    │  │ • transfer        │ │
//! │  │ • PUT  status      │  │  /api/admin/returns│  │ • offline sale    │ │
//! │  │ • GET  returns     │  │ • PUT  status      │  │ • stock logs      │ │
//! │  └────────────────────┘  └────────────────────┘  └───────────────────┘ │
//! │             │                      │                       │            │
//! │             └──────────────────────┼───────────────────────┘            │
//! │                                    ▼                                    │
//! │                       arcadia_db::Database (AppState)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `ARCADIA_PORT` - HTTP port (default: 8080)
//! - `ARCADIA_DATABASE_PATH` - SQLite file (default: arcadia.db)
//! - `ARCADIA_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `ARCADIA_ONLINE_COST_BPS` - Online cost ratio (default: 6500)
//! - `ARCADIA_IN_STORE_COST_BPS` - In-store cost ratio (default: 7000)
//! - `RUST_LOG` - Log filter

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use arcadia_db::Database;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Build the full application: every route plus the HTTP middleware.
pub fn build_app(state: AppState) -> Router {
    routes::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
