//! Proptest generators for property-based testing.
//!
//! Ids are drawn from a small pool so generated command sequences hit the
//! merge, increment, decrement-to-removal and not-found paths often.

use proptest::prelude::*;

use cartkit_core::{CartCommand, CatalogItem, ProductId};

/// Size of the id pool.
pub const ID_POOL: usize = 6;

/// Generate a product id from the pool.
pub fn product_id() -> impl Strategy<Value = ProductId> {
    (0..ID_POOL).prop_map(|n| ProductId::new(format!("p{}", n)))
}

/// Generate a display title.
pub fn title() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,12}( [a-z]{2,8})?".prop_map(String::from)
}

/// Generate an image URL.
pub fn image_url() -> impl Strategy<Value = String> {
    "[a-z0-9]{4,12}".prop_map(|slug| format!("https://cdn.example.com/{}.png", slug))
}

/// Generate a price in cents precision.
pub fn price() -> impl Strategy<Value = f64> {
    (0u32..=100_000u32).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Generate a catalog item.
pub fn catalog_item() -> impl Strategy<Value = CatalogItem> {
    (product_id(), title(), image_url(), price()).prop_map(|(id, title, image_url, price)| {
        CatalogItem {
            id,
            title,
            image_url,
            price,
        }
    })
}

/// Generate one cart command.
pub fn cart_command() -> impl Strategy<Value = CartCommand> {
    prop_oneof![
        3 => catalog_item().prop_map(CartCommand::Add),
        2 => product_id().prop_map(CartCommand::Increment),
        2 => product_id().prop_map(CartCommand::Decrement),
    ]
}

/// Generate a sequence of up to `max_len` commands.
pub fn command_sequence(max_len: usize) -> impl Strategy<Value = Vec<CartCommand>> {
    prop::collection::vec(cart_command(), 0..=max_len)
}

/// Generate a sequence of adds only.
pub fn add_sequence(max_len: usize) -> impl Strategy<Value = Vec<CatalogItem>> {
    prop::collection::vec(catalog_item(), 0..=max_len)
}
