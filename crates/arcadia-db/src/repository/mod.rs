//! # Repository Module
//!
//! SQL for every table the engine touches.
//!
//! ## Transaction-Scoped Repositories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service                                                               │
//! │       │  let mut tx = begin_write(&pool).await?;                       │
//! │       │                                                                 │
//! │       ├── inventory::reserve(&mut tx, &product, 2)                     │
//! │       ├── orders::insert(&mut tx, &new_order, total, now)              │
//! │       ├── sales::insert(&mut tx, &sale)                                │
//! │       │                                                                 │
//! │       ▼  tx.commit().await?   (or drop → rollback)                     │
//! │                                                                         │
//! │  Every function takes the caller's `&mut SqliteConnection`, so one     │
//! │  service call composes many statements into one atomic unit.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog`] - Products, branches, customers, suppliers, carts
//! - [`inventory`] - Inventory ledger and stock log
//! - [`orders`] - Orders and order lines
//! - [`sales`] - Sales ledger
//! - [`returns`] - Return rows
//! - [`purchases`] - Supplier purchases

pub mod catalog;
pub mod inventory;
pub mod orders;
pub mod purchases;
pub mod returns;
pub mod sales;
