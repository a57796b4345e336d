//! Key-value store abstraction with TTL and atomic increment.
//!
//! The cache layer talks to the store through [`KeyValueStore`] so the backing
//! service (a hosted Redis in deployment) can be swapped for the in-memory
//! implementation in tests and local runs.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

/// Primitives supplied by the external store: string get/set with expiry and
/// an atomic counter increment.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores a value and (re)applies the TTL. A write always refreshes the
    /// TTL; reads never extend it.
    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Atomically increments the integer at `key` (missing or expired keys
    /// count from zero) and returns the post-increment value. Applies no TTL.
    async fn incr(&self, key: &str) -> i64;

    /// Sets the TTL on an existing key.
    async fn expire(&self, key: &str, ttl: Duration);
}

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-memory [`KeyValueStore`] with lazy expiry. The single mutex makes
/// `incr` atomic across concurrent callers.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Some(Instant::now() + ttl),
            },
        );
    }

    async fn incr(&self, key: &str) -> i64 {
        let mut entries = self.entries.lock().await;
        let current = match entries.get(key) {
            Some(entry) if entry.is_expired() => 0,
            Some(entry) => entry.value.parse::<i64>().unwrap_or(0),
            None => 0,
        };
        let next = current + 1;
        // A fresh counter has no TTL until the caller sets one via expire().
        let expires_at = entries
            .get(key)
            .filter(|e| !e.is_expired())
            .and_then(|e| e.expires_at);
        entries.insert(
            key.to_string(),
            Entry {
                value: next.to_string(),
                expires_at,
            },
        );
        next
    }

    async fn expire(&self, key: &str, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
    }
}
