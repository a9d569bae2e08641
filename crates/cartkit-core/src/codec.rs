//! Durable encoding of a cart.
//!
//! The stored form is a JSON array of line items, in cart order:
//!
//! ```text
//! [{"id":"p1","title":"Mug","image_url":"https://...","price":10.0,"quantity":2}]
//! ```
//!
//! There is no version field. Decoding checks the cart invariants so a
//! corrupt payload is reported instead of being loaded.

use crate::cart::CartState;
use crate::error::CodecError;
use crate::item::LineItem;

/// Encode a cart to its stored JSON form.
pub fn encode(state: &CartState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(state)?)
}

/// Decode a stored JSON payload into a cart.
pub fn decode(payload: &str) -> Result<CartState, CodecError> {
    let items: Vec<LineItem> = serde_json::from_str(payload)?;
    CartState::from_items(items)
}
