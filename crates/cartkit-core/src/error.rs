//! Error types for cartkit core.

use thiserror::Error;

use crate::types::ProductId;

/// Errors from applying a [`CartCommand`](crate::CartCommand) to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command targets an id that is not in the cart.
    #[error("product {0} not in cart")]
    NotInCart(ProductId),

    /// The incoming price is NaN or infinite and could not be stored.
    #[error("product {0} has a non-finite price")]
    InvalidPrice(ProductId),

    /// The quantity is already at its maximum.
    #[error("quantity of product {0} is at its limit")]
    QuantityOverflow(ProductId),
}

/// Errors from decoding the durable cart payload.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed cart payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate product id in stored cart: {0}")]
    DuplicateId(ProductId),

    #[error("stored line item {0} has zero quantity")]
    ZeroQuantity(ProductId),

    #[error("line item {0} has a non-finite price")]
    NonFinitePrice(ProductId),
}
