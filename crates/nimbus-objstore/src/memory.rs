use crate::{errors::StoreError, metrics::StoreStats, model::ObjectMeta, r#trait::ObjectStore};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory store for tests and embedded use. Writers go through `put`,
/// which always advances the object fingerprint, even within one clock tick.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    state: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    metrics: StoreStats,
}

struct StoredObject {
    body: Bytes,
    etag: String,
    updated_ms: i64,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &StoreStats {
        &self.metrics
    }

    pub fn put(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        let body = body.into();
        let etag = Self::digest(&body);
        let mut guard = self.state.lock();
        let now = Utc::now().timestamp_millis();
        let entry = (bucket.to_string(), key.to_string());
        let updated_ms = match guard.get(&entry) {
            Some(prev) => now.max(prev.updated_ms + 1),
            None => now,
        };
        guard.insert(
            entry,
            StoredObject {
                body,
                etag,
                updated_ms,
            },
        );
    }

    pub fn remove(&self, bucket: &str, key: &str) {
        self.state
            .lock()
            .remove(&(bucket.to_string(), key.to_string()));
    }

    fn digest(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
        self.metrics.record_head();
        let guard = self.state.lock();
        let stored = guard
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::not_found(&format!("head: {bucket}/{key}")))?;
        Ok(ObjectMeta {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: stored.body.len() as u64,
            etag: Some(stored.etag.clone()),
            updated_ms: stored.updated_ms,
        })
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.metrics.record_get();
        let guard = self.state.lock();
        let stored = guard
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| StoreError::not_found(&format!("get: {bucket}/{key}")))?;
        Ok(stored.body.clone())
    }
}
