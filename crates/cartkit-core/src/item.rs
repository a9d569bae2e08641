//! Line items and the catalog descriptors they are built from.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A catalog product as handed to the cart: a line item without a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Catalog-assigned identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl CatalogItem {
    /// Create a new catalog item.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Attach a quantity, producing a line item.
    pub fn with_quantity(self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// One product entry in the cart.
///
/// Inside a [`CartState`](crate::CartState) the quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    /// Price of this line: unit price times quantity.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Strip the quantity, returning the catalog descriptor.
    pub fn descriptor(&self) -> CatalogItem {
        CatalogItem {
            id: self.id.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
        }
    }
}
