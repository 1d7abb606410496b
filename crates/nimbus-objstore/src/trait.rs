use crate::{errors::StoreError, model::ObjectMeta};
use async_trait::async_trait;
use bytes::Bytes;

/// Read-only view of a remote object store. Configuration documents are
/// fetched whole; `head` is the cheap metadata round-trip used for change
/// detection before paying for a download.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError>;
}
