//! Error types for the cart service.

use cartkit_core::CodecError;
use cartkit_store::StoreError;
use thiserror::Error;

/// Errors that can occur during cart operations.
///
/// Mutators never return these: a missing product is a
/// [`MutationOutcome::NotFound`](crate::MutationOutcome), and a failed write
/// is reported by the next [`flush`](crate::CartStore::flush).
#[derive(Debug, Error)]
pub enum CartError {
    /// Storage error while reading the stored cart.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The stored cart could not be decoded.
    #[error("stored cart is unreadable: {0}")]
    Codec(#[from] CodecError),

    /// A durable write failed. Memory still holds the newer state.
    #[error("failed to persist cart revision {revision}: {source}")]
    Persist {
        revision: u64,
        #[source]
        source: StoreError,
    },

    /// The cart was accessed before a provider installed one.
    #[error("use_cart must be used within a CartProvider")]
    MissingProvider,

    /// A provider already holds a cart.
    #[error("a cart has already been provided")]
    AlreadyProvided,

    /// The persistence writer has shut down.
    #[error("cart writer is closed")]
    WriterClosed,
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
