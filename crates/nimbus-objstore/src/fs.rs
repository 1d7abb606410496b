use crate::{errors::StoreError, metrics::StoreStats, model::ObjectMeta, r#trait::ObjectStore};
use async_trait::async_trait;
use bytes::Bytes;
use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

/// Filesystem-backed store for local development: `{root}/{bucket}/{key}`.
/// The file mtime is the fingerprint.
#[derive(Clone)]
pub struct FsObjectStore {
    pub root: PathBuf,
    metrics: StoreStats,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            metrics: StoreStats::default(),
        }
    }

    pub fn metrics(&self) -> &StoreStats {
        &self.metrics
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }

    fn mtime_ms(meta: &fs::Metadata) -> Result<i64, StoreError> {
        let modified = meta
            .modified()
            .map_err(|err| StoreError::unavailable(&format!("mtime: {err}")))?;
        let elapsed = modified
            .duration_since(UNIX_EPOCH)
            .map_err(|err| StoreError::unknown(&format!("mtime before epoch: {err}")))?;
        Ok(elapsed.as_millis() as i64)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
        self.metrics.record_head();
        let path = self.object_path(bucket, key);
        let meta = fs::metadata(&path)
            .map_err(|_| StoreError::not_found(&format!("head: {bucket}/{key}")))?;
        let updated_ms = Self::mtime_ms(&meta)?;
        Ok(ObjectMeta {
            bucket: bucket.to_string(),
            key: key.to_string(),
            size: meta.len(),
            etag: None,
            updated_ms,
        })
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.metrics.record_get();
        let path = self.object_path(bucket, key);
        let data =
            fs::read(&path).map_err(|_| StoreError::not_found(&format!("get: {bucket}/{key}")))?;
        Ok(Bytes::from(data))
    }
}
