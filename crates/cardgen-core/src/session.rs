//! Per-conversation batch cache
//!
//! Keeps only the most recent batch for every conversation so that export
//! buttons can refer back to it. Nothing is persisted; the cache starts empty
//! with the process and is dropped with it.

use crate::card::Batch;
use async_trait::async_trait;
use moka::future::Cache;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Opaque conversation key supplied by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(pub i64);

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interface for batch stores
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `batch` for the conversation, replacing any previous one
    async fn put(&self, conversation: ConversationId, batch: Arc<Batch>);
    /// Latest batch for the conversation, if any
    async fn get(&self, conversation: ConversationId) -> Option<Arc<Batch>>;
}

/// In-memory store backed by a concurrent cache.
///
/// Concurrent writers to the same conversation race; the last insert wins.
#[derive(Clone)]
pub struct InMemorySessionStore {
    cache: Cache<ConversationId, Arc<Batch>>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl InMemorySessionStore {
    /// Creates an empty store.
    ///
    /// With `max_capacity` unset entries are kept for the life of the process.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgen_core::session::InMemorySessionStore;
    ///
    /// let unbounded = InMemorySessionStore::new(None);
    /// let bounded = InMemorySessionStore::new(Some(10_000));
    /// ```
    #[must_use]
    pub fn new(max_capacity: Option<u64>) -> Self {
        let mut builder = Cache::builder();
        if let Some(capacity) = max_capacity {
            builder = builder.max_capacity(capacity);
        }
        Self {
            cache: builder.build(),
        }
    }

    /// Returns the current number of cached conversations
    ///
    /// The count is eventually consistent with recent inserts.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, conversation: ConversationId, batch: Arc<Batch>) {
        debug!(
            "Caching batch of {} records for conversation {}",
            batch.len(),
            conversation
        );
        self.cache.insert(conversation, batch).await;
    }

    async fn get(&self, conversation: ConversationId) -> Option<Arc<Batch>> {
        self.cache.get(&conversation).await
    }
}
