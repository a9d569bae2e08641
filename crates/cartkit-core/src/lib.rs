//! # Cartkit Core
//!
//! Pure primitives for the cart: line items, cart state, commands, and the
//! durable encoding.
//!
//! This crate contains no I/O, no storage, no async. It is pure computation
//! over the cart data model.
//!
//! ## Key Types
//!
//! - [`CatalogItem`] - A product descriptor handed to the cart (no quantity)
//! - [`LineItem`] - One cart entry with a positive quantity
//! - [`CartState`] - The ordered, id-unique sequence of line items
//! - [`CartCommand`] - Add / increment / decrement as pure state transitions
//!
//! ## Ordering
//!
//! Every accepted command moves the touched item to the end of the cart.
//! This order is part of the contract: `add(A)`, `add(B)`, `increment(A)`
//! leaves the cart as `[B, A]`.
//!
//! ## Encoding
//!
//! Carts are stored as a JSON array of line items. See [`codec`].

pub mod cart;
pub mod codec;
pub mod command;
pub mod error;
pub mod item;
pub mod types;

pub use cart::CartState;
pub use codec::{decode, encode};
pub use command::CartCommand;
pub use error::{CodecError, CommandError};
pub use item::{CatalogItem, LineItem};
pub use types::ProductId;
