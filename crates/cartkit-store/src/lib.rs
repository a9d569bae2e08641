//! # Cartkit Store
//!
//! Durable key-value storage for the cart. Provides a trait-based interface
//! with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The cart keeps its authoritative state in memory and mirrors a JSON
//! snapshot to one key of a [`Store`]. The store only deals in strings; it
//! knows nothing about carts.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait: `get`, `set`, `remove`
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cartkit_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     let store = SqliteStore::open("cart.db").unwrap();
//!     store.set("@GoStackMarketplace:cartItems", "[]").await.unwrap();
//!     let raw = store.get("@GoStackMarketplace:cartItems").await.unwrap();
//!     assert_eq!(raw.as_deref(), Some("[]"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Last write wins**: `set` replaces the value; there is no merge.
//! - **No write ordering**: concurrent `set` calls may land in any order.
//!   The cart serializes its own writes.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::Store;
