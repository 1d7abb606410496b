#[cfg(feature = "backend-gcs")]
mod real {
    use crate::{errors::StoreError, metrics::StoreStats, model::ObjectMeta, r#trait::ObjectStore};
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::{DateTime, Utc};
    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use serde::Deserialize;
    use std::sync::Arc;

    const JSON_API: &str = "https://storage.googleapis.com/storage/v1";
    const METADATA_TOKEN_URL: &str =
        "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

    /// Google Cloud Storage via the JSON API. `head` reads the object
    /// resource, `get` appends `alt=media` for the body.
    #[derive(Clone)]
    pub struct GcsObjectStore {
        client: reqwest::Client,
        token_source: TokenSource,
        // (token, expiry_ms); refreshed once the expiry is within a minute.
        cached_token: Arc<Mutex<Option<(String, i64)>>>,
        metrics: StoreStats,
    }

    #[derive(Clone, Debug, Default)]
    pub enum TokenSource {
        /// Unauthenticated requests; public buckets only.
        #[default]
        Anonymous,
        /// Fetch access tokens from the GCE metadata server.
        MetadataServer,
        /// Fixed bearer token supplied by the caller.
        Static(String),
    }

    #[derive(Deserialize)]
    struct ObjectResource {
        size: Option<String>,
        etag: Option<String>,
        updated: Option<String>,
    }

    #[derive(Deserialize)]
    struct TokenResponse {
        access_token: String,
        expires_in: i64,
    }

    impl GcsObjectStore {
        pub fn new(client: reqwest::Client) -> Self {
            Self {
                client,
                token_source: TokenSource::default(),
                cached_token: Arc::new(Mutex::new(None)),
                metrics: StoreStats::default(),
            }
        }

        pub fn with_token_source(mut self, source: TokenSource) -> Self {
            self.token_source = source;
            self
        }

        pub fn metrics(&self) -> &StoreStats {
            &self.metrics
        }

        fn object_url(bucket: &str, key: &str) -> String {
            format!(
                "{JSON_API}/b/{}/o/{}",
                urlencoding::encode(bucket),
                urlencoding::encode(key)
            )
        }

        async fn bearer_token(&self) -> Result<Option<String>, StoreError> {
            match &self.token_source {
                TokenSource::Anonymous => Ok(None),
                TokenSource::Static(token) => Ok(Some(token.clone())),
                TokenSource::MetadataServer => {
                    let now_ms = Utc::now().timestamp_millis();
                    if let Some((token, expiry_ms)) = self.cached_token.lock().clone() {
                        if expiry_ms - now_ms > 60_000 {
                            return Ok(Some(token));
                        }
                    }
                    let response = self
                        .client
                        .get(METADATA_TOKEN_URL)
                        .header("Metadata-Flavor", "Google")
                        .send()
                        .await
                        .map_err(nimbus_errors::ErrorObj::from)?;
                    if !response.status().is_success() {
                        return Err(StoreError::provider_unavailable(&format!(
                            "metadata token endpoint returned {}",
                            response.status()
                        )));
                    }
                    let token: TokenResponse = response
                        .json()
                        .await
                        .map_err(nimbus_errors::ErrorObj::from)?;
                    let expiry_ms = now_ms + token.expires_in * 1_000;
                    *self.cached_token.lock() = Some((token.access_token.clone(), expiry_ms));
                    Ok(Some(token.access_token))
                }
            }
        }

        async fn send(
            &self,
            url: &str,
            bucket: &str,
            key: &str,
        ) -> Result<reqwest::Response, StoreError> {
            let mut request = self.client.get(url);
            if let Some(token) = self.bearer_token().await? {
                request = request.bearer_auth(token);
            }
            let response = request.send().await.map_err(nimbus_errors::ErrorObj::from)?;
            match response.status() {
                status if status.is_success() => Ok(response),
                StatusCode::NOT_FOUND => {
                    Err(StoreError::not_found(&format!("gcs: {bucket}/{key}")))
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::forbidden(
                    &format!("gcs: {bucket}/{key} denied"),
                )),
                status => Err(StoreError::unavailable(&format!(
                    "gcs: {bucket}/{key} returned {status}"
                ))),
            }
        }

        fn updated_ms(resource: &ObjectResource) -> Result<i64, StoreError> {
            let raw = resource
                .updated
                .as_deref()
                .ok_or_else(|| StoreError::unknown("object resource missing updated field"))?;
            let parsed = DateTime::parse_from_rfc3339(raw)
                .map_err(|err| StoreError::unknown(&format!("updated timestamp: {err}")))?;
            Ok(parsed.timestamp_millis())
        }
    }

    #[async_trait]
    impl ObjectStore for GcsObjectStore {
        async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
            self.metrics.record_head();
            let url = Self::object_url(bucket, key);
            let response = self.send(&url, bucket, key).await?;
            let resource: ObjectResource = response
                .json()
                .await
                .map_err(nimbus_errors::ErrorObj::from)?;
            let updated_ms = Self::updated_ms(&resource)?;
            let size = resource
                .size
                .as_deref()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0);
            Ok(ObjectMeta {
                bucket: bucket.to_string(),
                key: key.to_string(),
                size,
                etag: resource.etag,
                updated_ms,
            })
        }

        async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
            self.metrics.record_get();
            let url = format!("{}?alt=media", Self::object_url(bucket, key));
            let response = self.send(&url, bucket, key).await?;
            response.bytes().await.map_err(|err| {
                StoreError::from(nimbus_errors::ErrorObj::from(err))
            })
        }
    }
}

#[cfg(feature = "backend-gcs")]
pub use real::{GcsObjectStore, TokenSource};

#[cfg(not(feature = "backend-gcs"))]
mod stub {
    use crate::{errors::StoreError, model::ObjectMeta, r#trait::ObjectStore};
    use async_trait::async_trait;
    use bytes::Bytes;

    #[derive(Clone, Default)]
    pub struct GcsObjectStore;

    impl GcsObjectStore {
        pub fn new() -> Self {
            Self
        }
    }

    #[async_trait]
    impl ObjectStore for GcsObjectStore {
        async fn head(&self, _bucket: &str, _key: &str) -> Result<ObjectMeta, StoreError> {
            Err(StoreError::provider_unavailable(
                "GCS adapter compiled in stub mode (enable backend-gcs feature)",
            ))
        }

        async fn get(&self, _bucket: &str, _key: &str) -> Result<Bytes, StoreError> {
            Err(StoreError::provider_unavailable(
                "GCS adapter compiled in stub mode (enable backend-gcs feature)",
            ))
        }
    }
}

#[cfg(not(feature = "backend-gcs"))]
pub use stub::GcsObjectStore;
