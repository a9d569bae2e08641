//! Store trait: the abstract interface for durable key-value persistence.
//!
//! The cart is agnostic to where its snapshot lives. Implementations include
//! SQLite (durable) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Async string key-value store.
///
/// Writes to a key replace the previous value outright: last write wins.
/// Callers that need ordered writes to a key must serialize them
/// themselves; the store makes no ordering promise across concurrent calls.
#[async_trait]
pub trait Store: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}
