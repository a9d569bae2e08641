//! Provider slot for sharing one cart with every consumer.
//!
//! The app owns a [`CartContext`], installs the opened cart once with
//! [`CartContext::provide`], and passes the context (or handles taken from
//! it) to whatever renders or edits the cart. Asking for the cart before it
//! has been provided is a configuration error, never an empty default.

use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use crate::cart::CartStore;
use crate::error::{CartError, Result};

/// Cheap, cloneable access to the shared cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    inner: Arc<CartStore>,
}

impl CartHandle {
    pub fn new(store: CartStore) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Whether two handles point at the same cart.
    pub fn same_cart(&self, other: &CartHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for CartHandle {
    type Target = CartStore;

    fn deref(&self) -> &CartStore {
        &self.inner
    }
}

/// Holds the cart for the lifetime of the app.
#[derive(Debug, Default)]
pub struct CartContext {
    slot: OnceLock<CartHandle>,
}

impl CartContext {
    /// An empty context. Nothing can use the cart until [`provide`](Self::provide).
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Install the cart. Only the first call succeeds.
    pub fn provide(&self, store: CartStore) -> Result<CartHandle> {
        let handle = CartHandle::new(store);
        self.slot
            .set(handle.clone())
            .map_err(|_| CartError::AlreadyProvided)?;
        Ok(handle)
    }

    /// Get the cart, failing hard if no provider installed one.
    pub fn use_cart(&self) -> Result<CartHandle> {
        self.slot.get().cloned().ok_or(CartError::MissingProvider)
    }

    pub fn is_provided(&self) -> bool {
        self.slot.get().is_some()
    }
}
