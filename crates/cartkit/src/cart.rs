//! The CartStore: authoritative cart state plus its durable mirror.
//!
//! Mutations are synchronous. Each one applies a [`CartCommand`] under the
//! state lock, publishes the new snapshot to subscribers, and queues the
//! encoded cart for the single writer before the lock is released. Queue
//! order is therefore mutation order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cartkit_core::{codec, CartCommand, CartState, CatalogItem, CommandError, ProductId};
use cartkit_store::Store;
use tokio::sync::watch;

use crate::config::{CartConfig, HydratePolicy};
use crate::error::Result;
use crate::notice::{Notice, Notifier};
use crate::writer::{PersistQueue, PersistTask};

/// Result of a mutator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The cart changed. `revision` counts accepted mutations since open.
    Applied { revision: u64 },
    /// The product wasn't in the cart. Nothing changed; a notice was sent.
    NotFound,
    /// The change would break a cart invariant (non-finite price, quantity
    /// at `u32::MAX`). Nothing changed and nothing was persisted.
    Rejected(CommandError),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

/// The cart service.
///
/// Construct with [`CartStore::open`], which hydrates from storage before
/// returning, so every method sees a loaded cart.
pub struct CartStore {
    config: CartConfig,
    state: watch::Sender<CartState>,
    revision: AtomicU64,
    writer: PersistQueue,
    notifier: Arc<dyn Notifier>,
}

impl CartStore {
    /// Hydrate the cart from `store` and start its writer.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn open(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        config: CartConfig,
    ) -> Result<Self> {
        let initial = Self::hydrate(store.as_ref(), &config).await?;
        let (state, _) = watch::channel(initial);
        let writer = PersistQueue::spawn(store, config.storage_key.clone(), config.coalesce_writes);

        Ok(Self {
            config,
            state,
            revision: AtomicU64::new(0),
            writer,
            notifier,
        })
    }

    async fn hydrate(store: &dyn Store, config: &CartConfig) -> Result<CartState> {
        let key = config.storage_key.as_str();
        let state = match store.get(key).await? {
            None => CartState::new(),
            Some(raw) => match codec::decode(&raw) {
                Ok(state) => state,
                Err(e) if config.on_corrupt == HydratePolicy::Discard => {
                    tracing::warn!(key, error = %e, "discarding unreadable stored cart");
                    CartState::new()
                }
                Err(e) => return Err(e.into()),
            },
        };

        tracing::info!(key, items = state.len(), "cart hydrated");
        tracing::debug!(products = ?state.ids(), "hydrated cart contents");
        Ok(state)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a catalog item, merging with an existing entry of the same id.
    pub fn add_to_cart(&self, item: CatalogItem) -> MutationOutcome {
        self.execute(CartCommand::Add(item))
    }

    /// Increase a product's quantity by one.
    pub fn increment(&self, id: impl Into<ProductId>) -> MutationOutcome {
        self.execute(CartCommand::Increment(id.into()))
    }

    /// Decrease a product's quantity by one, removing it at zero.
    pub fn decrement(&self, id: impl Into<ProductId>) -> MutationOutcome {
        self.execute(CartCommand::Decrement(id.into()))
    }

    /// Empty the cart.
    pub fn clear(&self) -> MutationOutcome {
        let mut revision = 0;
        self.state.send_modify(|state| {
            *state = CartState::new();
            revision = self.accept(state, "clear");
        });
        tracing::debug!(revision, "cart cleared");
        MutationOutcome::Applied { revision }
    }

    /// Apply a command and queue its snapshot.
    pub fn execute(&self, command: CartCommand) -> MutationOutcome {
        let mut result = Err(CommandError::NotInCart(command.product_id().clone()));

        self.state.send_if_modified(|state| match command.apply(state) {
            Ok(next) => {
                *state = next;
                result = Ok(self.accept(state, command.name()));
                true
            }
            Err(e) => {
                result = Err(e);
                false
            }
        });

        match result {
            Ok(revision) => {
                tracing::debug!(%command, revision, "cart mutation applied");
                MutationOutcome::Applied { revision }
            }
            Err(CommandError::NotInCart(id)) => {
                self.notifier.notify(&Notice::ProductNotFound { id });
                MutationOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!(%command, error = %e, "cart mutation rejected");
                MutationOutcome::Rejected(e)
            }
        }
    }

    /// Bump the revision and queue `state` for writing.
    ///
    /// Runs inside the watch lock, which keeps queue order equal to
    /// mutation order.
    fn accept(&self, state: &CartState, op: &str) -> u64 {
        let revision = self.revision.fetch_add(1, Ordering::Relaxed) + 1;
        match codec::encode(state) {
            Ok(payload) => self.writer.enqueue(PersistTask { revision, payload }),
            Err(e) => tracing::warn!(op, revision, error = %e, "could not encode cart; not persisted"),
        }
        revision
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of the current cart.
    pub fn products(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every accepted mutation.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Number of accepted mutations since open.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Wait for every queued write to finish.
    ///
    /// Returns the most recent write failure since the previous flush, if
    /// any. Failed writes are not retried; the next mutation writes the full
    /// cart again.
    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }

    /// Flush and stop the writer. Later mutations stay in memory only.
    pub async fn close(&self) -> Result<()> {
        self.writer.shutdown().await
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.config.storage_key)
            .field("revision", &self.revision())
            .field("items", &self.state.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CartError;
    use cartkit_store::MemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Notices(Mutex<Vec<Notice>>);

    impl Notifier for Notices {
        fn notify(&self, notice: &Notice) {
            self.0.lock().unwrap().push(notice.clone());
        }
    }

    impl Notices {
        fn count(&self) -> usize {
            self.0.lock().unwrap().len()
        }
    }

    fn item(id: &str, price: f64) -> CatalogItem {
        CatalogItem::new(id, format!("Product {}", id), format!("https://img/{}.png", id), price)
    }

    async fn open(store: Arc<MemoryStore>) -> (CartStore, Arc<Notices>) {
        let notices = Arc::new(Notices::default());
        let cart = CartStore::open(store, notices.clone(), CartConfig::default())
            .await
            .unwrap();
        (cart, notices)
    }

    #[tokio::test]
    async fn test_starts_empty_without_stored_cart() {
        let (cart, _) = open(Arc::new(MemoryStore::new())).await;
        assert!(cart.products().is_empty());
        assert_eq!(cart.revision(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let store = Arc::new(MemoryStore::new());
        let (cart, notices) = open(store.clone()).await;

        cart.add_to_cart(item("p1", 10.0));
        assert_eq!(cart.products().get("p1").unwrap().quantity, 1);

        cart.add_to_cart(item("p1", 10.0));
        assert_eq!(cart.products().len(), 1);
        assert_eq!(cart.products().get("p1").unwrap().quantity, 2);

        cart.decrement("p1");
        assert_eq!(cart.products().get("p1").unwrap().quantity, 1);

        cart.decrement("p1");
        assert!(cart.products().is_empty());

        cart.flush().await.unwrap();
        let key = cart.config().storage_key.clone();
        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(notices.count(), 0);
        assert_eq!(cart.revision(), 4);
    }

    #[tokio::test]
    async fn test_not_found_leaves_state_and_notifies_once() {
        let (cart, notices) = open(Arc::new(MemoryStore::new())).await;
        cart.add_to_cart(item("a", 1.0));
        let before = codec::encode(&cart.products()).unwrap();

        assert_eq!(cart.increment("missing"), MutationOutcome::NotFound);
        assert_eq!(notices.count(), 1);
        assert_eq!(cart.decrement("missing"), MutationOutcome::NotFound);
        assert_eq!(notices.count(), 2);

        assert_eq!(codec::encode(&cart.products()).unwrap(), before);
        assert_eq!(cart.revision(), 1);
    }

    #[tokio::test]
    async fn test_invalid_price_rejected_without_notice() {
        let store = Arc::new(MemoryStore::new());
        let (cart, notices) = open(store.clone()).await;
        cart.add_to_cart(item("a", 1.0));

        let outcome = cart.add_to_cart(item("b", f64::INFINITY));
        assert_eq!(outcome, MutationOutcome::Rejected(CommandError::InvalidPrice("b".into())));
        assert_eq!(notices.count(), 0);
        assert_eq!(cart.revision(), 1);
        assert_eq!(cart.products().ids(), vec![ProductId::from("a")]);
    }

    #[tokio::test]
    async fn test_reordering() {
        let (cart, _) = open(Arc::new(MemoryStore::new())).await;
        cart.add_to_cart(item("A", 1.0));
        cart.add_to_cart(item("B", 1.0));
        cart.increment("A");

        assert_eq!(cart.products().ids(), vec![ProductId::from("B"), ProductId::from("A")]);
    }

    #[tokio::test]
    async fn test_hydrates_stored_cart() {
        let payload = r#"[{"id":"x","title":"X","image_url":"u","price":3.5,"quantity":4}]"#;
        let store = Arc::new(MemoryStore::seeded(crate::DEFAULT_STORAGE_KEY, payload));
        let (cart, _) = open(store).await;

        let products = cart.products();
        assert_eq!(products.len(), 1);
        assert_eq!(products.get("x").unwrap().quantity, 4);
    }

    #[tokio::test]
    async fn test_corrupt_cart_discarded_by_default() {
        let store = Arc::new(MemoryStore::seeded(crate::DEFAULT_STORAGE_KEY, "{oops"));
        let (cart, _) = open(store).await;
        assert!(cart.products().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_cart_fails_when_strict() {
        let store = Arc::new(MemoryStore::seeded(crate::DEFAULT_STORAGE_KEY, "{oops"));
        let config = CartConfig::default().with_hydrate_policy(HydratePolicy::Fail);
        let result = CartStore::open(store, Arc::new(Notices::default()), config).await;
        assert!(matches!(result, Err(CartError::Codec(_))));
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let (cart, _) = open(Arc::new(MemoryStore::new())).await;
        let mut rx = cart.subscribe();

        cart.add_to_cart(item("a", 1.0));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        // A rejected mutation doesn't wake subscribers.
        cart.increment("nope");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_clear_persists_empty_cart() {
        let store = Arc::new(MemoryStore::new());
        let (cart, _) = open(store.clone()).await;
        cart.add_to_cart(item("a", 1.0));
        cart.add_to_cart(item("b", 1.0));

        assert!(cart.clear().is_applied());
        cart.flush().await.unwrap();

        assert!(cart.products().is_empty());
        let raw = store.get(crate::DEFAULT_STORAGE_KEY).await.unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_close_stops_persisting() {
        let store = Arc::new(MemoryStore::new());
        let (cart, _) = open(store.clone()).await;
        cart.add_to_cart(item("a", 1.0));
        cart.close().await.unwrap();

        // Still applied in memory.
        assert!(cart.add_to_cart(item("b", 1.0)).is_applied());
        assert_eq!(cart.products().len(), 2);

        let raw = store.get(crate::DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        let stored = codec::decode(&raw).unwrap();
        assert_eq!(stored.ids(), vec![ProductId::from("a")]);
    }
}
