//! User-visible notices raised by the cart.

use std::fmt;

use cartkit_core::ProductId;

/// Text shown when a quantity change targets a product that isn't in the cart.
pub const PRODUCT_NOT_FOUND: &str = "Product not found in cart, refresh your app.";

/// A message meant for the person using the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Increment or decrement named a product the cart doesn't hold.
    ProductNotFound { id: ProductId },
}

impl Notice {
    /// The fixed text to display.
    pub fn message(&self) -> &'static str {
        match self {
            Notice::ProductNotFound { .. } => PRODUCT_NOT_FOUND,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Delivers notices to the UI.
///
/// The host decides how to show them (typically a blocking alert).
/// Called synchronously from the mutator, outside the cart lock.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

impl<F> Notifier for F
where
    F: Fn(&Notice) + Send + Sync,
{
    fn notify(&self, notice: &Notice) {
        self(notice)
    }
}

/// Notifier that only logs. Used when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::ProductNotFound { id } => {
                tracing::warn!(product_id = %id, "{}", notice);
            }
        }
    }
}
