//! CartState: the ordered sequence of line items.
//!
//! Every mutation locates an item by id, splices it out, and pushes the
//! updated item back onto the tail. The most recently touched item is
//! therefore always last, and consumers rendering the list in order see that.

use serde::Serialize;

use crate::error::{CodecError, CommandError};
use crate::item::{CatalogItem, LineItem};
use crate::types::ProductId;

/// An ordered cart. At most one entry per id, every quantity ≥ 1, every
/// price finite.
///
/// The `with_*` methods return a new state and leave the receiver untouched.
/// Stored carts come back through [`CartState::from_items`], which rejects
/// payloads that break the invariants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored items, checking the cart invariants.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CodecError> {
        for (i, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CodecError::ZeroQuantity(item.id.clone()));
            }
            if !item.price.is_finite() {
                return Err(CodecError::NonFinitePrice(item.id.clone()));
            }
            if items[..i].iter().any(|earlier| earlier.id == item.id) {
                return Err(CodecError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// The items, in cart order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Sum of all quantities (the badge count).
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price × quantity over every line.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Add a catalog item.
    ///
    /// An existing entry is spliced out and re-appended with quantity + 1,
    /// taking the incoming title, image and price. A new entry is appended
    /// with quantity 1. A non-finite price or a quantity already at
    /// `u32::MAX` is rejected and the receiver is left as it was.
    pub fn with_added(&self, item: CatalogItem) -> Result<Self, CommandError> {
        if !item.price.is_finite() {
            return Err(CommandError::InvalidPrice(item.id));
        }
        let mut items = self.items.clone();
        let quantity = match self.position(item.id.as_str()) {
            Some(index) => {
                let quantity = Self::bumped(&items[index])?;
                items.remove(index);
                quantity
            }
            None => 1,
        };
        items.push(item.with_quantity(quantity));
        Ok(Self { items })
    }

    /// Increment an existing entry and move it to the tail.
    pub fn with_incremented(&self, id: &str) -> Result<Self, CommandError> {
        let index = self.require(id)?;
        let quantity = Self::bumped(&self.items[index])?;
        let mut items = self.items.clone();
        let mut item = items.remove(index);
        item.quantity = quantity;
        items.push(item);
        Ok(Self { items })
    }

    /// Decrement an existing entry.
    ///
    /// The entry moves to the tail, or leaves the cart when its quantity
    /// reaches zero.
    pub fn with_decremented(&self, id: &str) -> Result<Self, CommandError> {
        let index = self.require(id)?;
        let mut items = self.items.clone();
        let mut item = items.remove(index);
        item.quantity -= 1;
        if item.quantity > 0 {
            items.push(item);
        }
        Ok(Self { items })
    }

    fn require(&self, id: &str) -> Result<usize, CommandError> {
        self.position(id)
            .ok_or_else(|| CommandError::NotInCart(ProductId::from(id)))
    }

    fn bumped(item: &LineItem) -> Result<u32, CommandError> {
        item.quantity
            .checked_add(1)
            .ok_or_else(|| CommandError::QuantityOverflow(item.id.clone()))
    }

    /// Ids in cart order.
    pub fn ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64) -> CatalogItem {
        CatalogItem::new(id, format!("title {}", id), format!("https://img/{}.png", id), price)
    }

    fn cart_of(adds: &[(&str, f64)]) -> CartState {
        adds.iter().fold(CartState::new(), |cart, (id, price)| {
            cart.with_added(item(id, *price)).unwrap()
        })
    }

    #[test]
    fn test_add_new_item_appends_with_quantity_one() {
        let cart = cart_of(&[("a", 1.0), ("b", 2.0)]);
        assert_eq!(cart.ids(), vec![ProductId::from("a"), ProductId::from("b")]);
        assert!(cart.iter().all(|i| i.quantity == 1));
    }

    #[test]
    fn test_add_existing_merges_incoming_fields() {
        let cart = cart_of(&[("a", 1.0)]);
        let updated = CatalogItem::new("a", "renamed", "https://img/new.png", 9.0);
        let cart = cart.with_added(updated).unwrap();

        assert_eq!(cart.len(), 1);
        let a = cart.get("a").unwrap();
        assert_eq!(a.quantity, 2);
        assert_eq!(a.title, "renamed");
        assert_eq!(a.image_url, "https://img/new.png");
        assert_eq!(a.price, 9.0);
    }

    #[test]
    fn test_add_existing_moves_to_tail() {
        let cart = cart_of(&[("a", 1.0), ("b", 1.0), ("a", 1.0)]);
        assert_eq!(cart.ids(), vec![ProductId::from("b"), ProductId::from("a")]);
    }

    #[test]
    fn test_add_rejects_non_finite_price() {
        let cart = cart_of(&[("a", 1.0)]);
        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = cart.with_added(item("bad", price)).unwrap_err();
            assert_eq!(err, CommandError::InvalidPrice("bad".into()));
        }
        // Also when merging into an existing entry.
        let err = cart.with_added(item("a", f64::NAN)).unwrap_err();
        assert_eq!(err, CommandError::InvalidPrice("a".into()));
        assert_eq!(cart.get("a").unwrap().price, 1.0);
    }

    #[test]
    fn test_increment_reorders() {
        let cart = cart_of(&[("a", 1.0), ("b", 1.0)]);
        let cart = cart.with_incremented("a").unwrap();

        assert_eq!(cart.ids(), vec![ProductId::from("b"), ProductId::from("a")]);
        assert_eq!(cart.get("a").unwrap().quantity, 2);
        assert_eq!(cart.get("b").unwrap().quantity, 1);
    }

    #[test]
    fn test_increment_missing() {
        let cart = cart_of(&[("a", 1.0)]);
        assert_eq!(
            cart.with_incremented("zzz").unwrap_err(),
            CommandError::NotInCart("zzz".into())
        );
    }

    #[test]
    fn test_quantity_limit_is_rejected() {
        let full = CartState::from_items(vec![item("a", 1.0).with_quantity(u32::MAX)]).unwrap();

        let err = full.with_incremented("a").unwrap_err();
        assert_eq!(err, CommandError::QuantityOverflow("a".into()));
        let err = full.with_added(item("a", 1.0)).unwrap_err();
        assert_eq!(err, CommandError::QuantityOverflow("a".into()));

        let lower = full.with_decremented("a").unwrap();
        assert_eq!(lower.get("a").unwrap().quantity, u32::MAX - 1);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let cart = cart_of(&[("a", 1.0), ("b", 1.0)]);
        let cart = cart.with_decremented("a").unwrap();
        assert_eq!(cart.ids(), vec![ProductId::from("b")]);
    }

    #[test]
    fn test_decrement_keeps_positive_at_tail() {
        let cart = cart_of(&[("a", 1.0), ("a", 1.0), ("b", 1.0)]);
        let cart = cart.with_decremented("a").unwrap();
        assert_eq!(cart.ids(), vec![ProductId::from("b"), ProductId::from("a")]);
        assert_eq!(cart.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_receiver_is_untouched() {
        let before = cart_of(&[("a", 1.0)]);
        let _after = before.with_incremented("a").unwrap();
        assert_eq!(before.get("a").unwrap().quantity, 1);
    }

    #[test]
    fn test_totals() {
        let cart = cart_of(&[("a", 2.5), ("a", 2.5), ("b", 10.0)]);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.subtotal(), 15.0);
    }

    #[test]
    fn test_from_items_rejects_broken_items() {
        let a = item("a", 1.0).with_quantity(1);
        let dup = CartState::from_items(vec![a.clone(), a.clone()]);
        assert!(matches!(dup, Err(CodecError::DuplicateId(id)) if id == "a"));

        let zero = CartState::from_items(vec![item("b", 1.0).with_quantity(0)]);
        assert!(matches!(zero, Err(CodecError::ZeroQuantity(id)) if id == "b"));

        let nan = CartState::from_items(vec![item("c", f64::NAN).with_quantity(1)]);
        assert!(matches!(nan, Err(CodecError::NonFinitePrice(id)) if id == "c"));
    }
}
