//! # Cartkit
//!
//! An in-memory shopping cart kept in step with durable local storage, so
//! the cart survives app restarts.
//!
//! ## Overview
//!
//! - **Hydrate once**: [`CartStore::open`] reads the stored cart before
//!   returning. Nothing can touch an unloaded cart.
//! - **Mutate synchronously**: `add_to_cart`, `increment` and `decrement`
//!   update memory immediately and return.
//! - **Persist in the background**: every accepted mutation queues the whole
//!   cart for a single writer task, which writes in mutation order.
//! - **Share explicitly**: a [`CartContext`] hands out [`CartHandle`]s and
//!   fails with [`CartError::MissingProvider`] if nothing was provided.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cartkit::{CartConfig, CartContext, CartStore, LogNotifier};
//! use cartkit::core::CatalogItem;
//! use cartkit::store::SqliteStore;
//!
//! async fn example() -> cartkit::Result<()> {
//!     let store = Arc::new(SqliteStore::open("cart.db")?);
//!     let cart = CartStore::open(store, Arc::new(LogNotifier), CartConfig::default()).await?;
//!
//!     let context = CartContext::new();
//!     context.provide(cart)?;
//!
//!     let cart = context.use_cart()?;
//!     cart.add_to_cart(CatalogItem::new("p1", "Mug", "https://img/mug.png", 12.0));
//!     cart.increment("p1");
//!     cart.flush().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `cartkit::core` - Data model and durable encoding
//! - `cartkit::store` - Storage trait and backends

pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod notice;
pub mod writer;

// Re-export component crates
pub use cartkit_core as core;
pub use cartkit_store as store;

pub use cart::{CartStore, MutationOutcome};
pub use config::{CartConfig, HydratePolicy, DEFAULT_STORAGE_KEY};
pub use context::{CartContext, CartHandle};
pub use error::{CartError, Result};
pub use notice::{LogNotifier, Notice, Notifier, PRODUCT_NOT_FOUND};
pub use writer::PersistTask;

pub use cartkit_core::{CartCommand, CartState, CatalogItem, CommandError, LineItem, ProductId};
