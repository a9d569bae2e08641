//! Test fixtures and helpers.
//!
//! Common setup code for cart tests: a memory-backed fixture, a notifier
//! that records what it was told, and stores that fail or lag on demand.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cartkit::{CartConfig, CartStore, Notice, Notifier};
use cartkit_core::{codec, CartState, CatalogItem};
use cartkit_store::{MemoryStore, Result as StoreResult, Store, StoreError};

/// Notifier that keeps every notice it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.lock().push(notice.clone());
    }
}

/// A catalog item with predictable fields derived from `id`.
pub fn catalog_item(id: &str, price: f64) -> CatalogItem {
    CatalogItem::new(
        id,
        format!("Product {}", id),
        format!("https://cdn.example.com/{}.png", id),
        price,
    )
}

/// A test fixture with a memory store and a recording notifier.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub config: CartConfig,
}

impl TestFixture {
    /// Fresh fixture with nothing stored.
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            config: CartConfig::default(),
        }
    }

    /// Fixture whose store already holds `payload` under the cart key.
    pub fn with_stored(payload: &str) -> Self {
        let config = CartConfig::default();
        Self {
            store: Arc::new(MemoryStore::seeded(config.storage_key.clone(), payload)),
            notifier: Arc::new(RecordingNotifier::new()),
            config,
        }
    }

    /// Open a cart over this fixture's store.
    pub async fn open_cart(&self) -> CartStore {
        self.try_open_cart()
            .await
            .unwrap_or_else(|e| panic!("cart failed to open: {}", e))
    }

    pub async fn try_open_cart(&self) -> cartkit::Result<CartStore> {
        CartStore::open(
            self.store.clone(),
            self.notifier.clone(),
            self.config.clone(),
        )
        .await
    }

    /// Raw payload currently under the cart key.
    pub async fn stored_payload(&self) -> Option<String> {
        self.store
            .get(&self.config.storage_key)
            .await
            .unwrap_or_else(|e| panic!("memory store read failed: {}", e))
    }

    /// Decoded cart currently under the cart key.
    pub async fn stored_cart(&self) -> Option<CartState> {
        let raw = self.stored_payload().await?;
        Some(codec::decode(&raw).unwrap_or_else(|e| panic!("stored cart unreadable: {}", e)))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Store whose reads or writes can be switched to fail.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: AtomicBool,
    failing_reads: AtomicBool,
    attempts: AtomicUsize,
}

impl FailingStore {
    /// A store that fails every write until told otherwise.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make `get` fail as well.
    pub fn set_failing_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    /// Number of `set` calls seen, failed or not.
    pub fn write_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage locked".into()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("disk full".into()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }
}

/// Store where earlier writes take longer than later ones.
///
/// Without a single writer, concurrent writes against it finish newest
/// first, so a stale snapshot would win.
pub struct LaggyStore {
    inner: MemoryStore,
    base_delay: Duration,
    calls: AtomicUsize,
    completed: Mutex<Vec<String>>,
}

impl LaggyStore {
    /// The n-th write sleeps `base_delay / (n + 1)`.
    pub fn new(base_delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            base_delay,
            calls: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
        }
    }

    /// Values written, in the order the writes finished.
    pub fn completed_writes(&self) -> Vec<String> {
        self.completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Store for LaggyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) as u32;
        tokio::time::sleep(self.base_delay / (n + 1)).await;
        self.inner.set(key, value).await?;
        self.completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }
}
