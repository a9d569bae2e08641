//! Cart configuration.

/// Key the mobile storefront has always stored its cart under.
pub const DEFAULT_STORAGE_KEY: &str = "@GoStackMarketplace:cartItems";

/// What to do when the stored cart can't be decoded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HydratePolicy {
    /// Log a warning and start with an empty cart.
    #[default]
    Discard,
    /// Refuse to open the cart.
    Fail,
}

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Durable key holding the JSON cart.
    pub storage_key: String,
    /// Handling of a corrupt stored cart.
    pub on_corrupt: HydratePolicy,
    /// Whether the writer may skip straight to the newest queued snapshot
    /// when it falls behind.
    pub coalesce_writes: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            on_corrupt: HydratePolicy::default(),
            coalesce_writes: true,
        }
    }
}

impl CartConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_hydrate_policy(mut self, policy: HydratePolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn with_coalesced_writes(mut self, coalesce: bool) -> Self {
        self.coalesce_writes = coalesce;
        self
    }
}
