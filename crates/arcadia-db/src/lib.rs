//! # arcadia-db: Storage and Fulfillment Engine
//!
//! SQLite storage for the inventory and order fulfillment engine, and the
//! transactional services that implement every write operation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Arcadia Request Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /api/orders)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    arcadia-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐     │   │
//! │  │   │   Services    │──►│ Repositories  │──►│   Database   │     │   │
//! │  │   │ (service/)    │   │ (repository/) │   │  (pool.rs)   │     │   │
//! │  │   │ OrderService  │   │ inventory     │   │ SqlitePool   │     │   │
//! │  │   │ ReturnService │   │ orders, sales │   │ BEGIN        │     │   │
//! │  │   │ StockService  │   │ returns, ...  │   │  IMMEDIATE   │     │   │
//! │  │   └───────┬───────┘   └───────────────┘   └──────────────┘     │   │
//! │  │           │ asks                                                │   │
//! │  │           ▼                                                     │   │
//! │  │   arcadia-core: transition plans, allocation, validation        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration, write transactions
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - `DbError` and `EngineError`
//! - [`repository`] - SQL per table, on caller-supplied connections
//! - [`service`] - One method per engine operation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arcadia_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("arcadia.db")).await?;
//!
//! let order_id = db.orders().create_order(&new_order).await?;
//! db.orders().update_status(order_id, OrderStatus::Shipped).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, EngineError, EngineResult};
pub use pool::{Database, DbConfig};
pub use service::{EngineConfig, OrderService, ReturnService, StockService, TransferOutcome};
