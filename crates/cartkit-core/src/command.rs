//! Cart commands.
//!
//! A command is a pure function from one cart state to the next. The service
//! layer applies it under its lock and hands the resulting state to the
//! persistence queue.

use std::fmt;

use crate::cart::CartState;
use crate::error::CommandError;
use crate::item::CatalogItem;
use crate::types::ProductId;

/// One of the three cart mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Add a catalog item, merging with an existing entry.
    Add(CatalogItem),
    /// Bump an existing entry's quantity by one.
    Increment(ProductId),
    /// Drop an existing entry's quantity by one, removing it at zero.
    Decrement(ProductId),
}

impl CartCommand {
    /// The product this command targets.
    pub fn product_id(&self) -> &ProductId {
        match self {
            CartCommand::Add(item) => &item.id,
            CartCommand::Increment(id) | CartCommand::Decrement(id) => id,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::Add(_) => "add",
            CartCommand::Increment(_) => "increment",
            CartCommand::Decrement(_) => "decrement",
        }
    }

    /// Compute the next state.
    ///
    /// `Increment` and `Decrement` fail with [`CommandError::NotInCart`] when
    /// the id is absent. `Add` fails only on a non-finite price. Any command
    /// fails with [`CommandError::QuantityOverflow`] rather than saturate.
    /// On failure `state` is left as it was.
    pub fn apply(&self, state: &CartState) -> Result<CartState, CommandError> {
        match self {
            CartCommand::Add(item) => state.with_added(item.clone()),
            CartCommand::Increment(id) => state.with_incremented(id.as_str()),
            CartCommand::Decrement(id) => state.with_decremented(id.as_str()),
        }
    }
}

impl fmt::Display for CartCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.product_id())
    }
}
