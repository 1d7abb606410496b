use super::*;
use crate::errors::{load_failed, parse_failed, schema_invalid, ConfigError};
use crate::flatten::FlatSnapshot;
use crate::model::{KeyPath, Layer, ProvenanceEntry};
use crate::watch::{ChangeNotice, WatchTx};
use arc_swap::ArcSwap;
use chrono::Utc;
use futures::SinkExt;
use nimbus_objstore::ObjectStore;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Remote JSON document as a configuration source. Holds an always-available
/// flattened snapshot of one object in the store, loaded synchronously at
/// connect time and refreshed by a fixed-interval polling task that compares
/// the object's last-modified fingerprint before paying for a download.
pub struct RemoteDocProvider {
    shared: Arc<Shared>,
    poll_interval: Option<Duration>,
    guard: Mutex<Option<PollGuard>>,
}

impl std::fmt::Debug for RemoteDocProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDocProvider")
            .field("bucket", &self.shared.bucket)
            .field("object", &self.shared.object)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

struct Shared {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    object: String,
    current: ArcSwap<FlatSnapshot>,
    // updated_ms of the revision the current snapshot was loaded from
    fingerprint: AtomicI64,
    stats: ProviderStats,
    notify: Mutex<Option<WatchTx>>,
}

impl RemoteDocProvider {
    /// Captures the object's fingerprint and performs the initial load.
    /// Both calls must succeed; a missing object, denied access, or
    /// malformed body fails construction so the host refuses to start
    /// without its required configuration.
    pub async fn connect(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        object: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let shared = Arc::new(Shared {
            store,
            bucket: bucket.into(),
            object: object.into(),
            current: ArcSwap::from_pointee(FlatSnapshot::empty()),
            fingerprint: AtomicI64::new(0),
            stats: ProviderStats::default(),
            notify: Mutex::new(None),
        });

        let meta = shared
            .store
            .head(&shared.bucket, &shared.object)
            .await
            .map_err(|err| load_failed(&shared.bucket, &shared.object, err.into_inner()))?;
        shared.fingerprint.store(meta.updated_ms, Ordering::SeqCst);
        shared.load(false).await?;

        Ok(Self {
            shared,
            poll_interval: None,
            guard: Mutex::new(None),
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn bucket(&self) -> &str {
        &self.shared.bucket
    }

    pub fn object(&self) -> &str {
        &self.shared.object
    }

    /// Current snapshot; safe to call from any thread at any time, including
    /// while a reload is in flight.
    pub fn snapshot(&self) -> Arc<FlatSnapshot> {
        self.shared.current.load_full()
    }

    pub fn try_get(&self, key: &str) -> Option<String> {
        self.shared.current.load().get(key).map(str::to_string)
    }

    pub fn stats(&self) -> &ProviderStats {
        &self.shared.stats
    }

    /// Stops the polling task and waits for it to exit. Dropping the
    /// provider instead signals cancellation and aborts without waiting.
    pub async fn shutdown(&self) {
        let guard = self.guard.lock().take();
        if let Some(guard) = guard {
            guard.shutdown().await;
        }
    }
}

impl Shared {
    async fn load(&self, reload: bool) -> Result<(), ConfigError> {
        let body = self
            .store
            .get(&self.bucket, &self.object)
            .await
            .map_err(|err| load_failed(&self.bucket, &self.object, err.into_inner()))?;
        let document: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|err| parse_failed(&self.bucket, &self.object, &err.to_string()))?;
        let root = match document {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(parse_failed(
                    &self.bucket,
                    &self.object,
                    &format!("document root must be an object, got {other:?}"),
                ))
            }
        };

        self.current.store(Arc::new(FlatSnapshot::from_document(&root)));

        if reload {
            self.stats.record_reload();
            let tx = self.notify.lock().clone();
            if let Some(mut tx) = tx {
                let notice = ChangeNotice {
                    source_id: "remote".to_string(),
                    changed: vec![KeyPath("**".into())],
                    ts: Utc::now().timestamp_millis(),
                };
                let _ = tx.send(notice).await;
            }
        }

        Ok(())
    }

    /// One poll tick: metadata round-trip first, full download only when the
    /// fingerprint moved. The new fingerprint is recorded only after a
    /// successful load, so a failed download is retried next tick.
    async fn poll_once(&self) -> Result<(), ConfigError> {
        self.stats.record_poll();
        let meta = self
            .store
            .head(&self.bucket, &self.object)
            .await
            .map_err(|err| load_failed(&self.bucket, &self.object, err.into_inner()))?;
        if meta.updated_ms != self.fingerprint.load(Ordering::SeqCst) {
            self.load(true).await?;
            self.fingerprint.store(meta.updated_ms, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Source for RemoteDocProvider {
    fn id(&self) -> &'static str {
        "remote"
    }

    async fn load(&self) -> Result<SourceSnapshot, ConfigError> {
        let snapshot = self.shared.current.load_full();
        Ok(SourceSnapshot {
            map: snapshot.to_nested(),
            provenance: vec![ProvenanceEntry {
                key: KeyPath("**".into()),
                source_id: self.id().to_string(),
                layer: Layer::Remote,
                version: None,
                ts_ms: Utc::now().timestamp_millis(),
            }],
        })
    }

    fn supports_watch(&self) -> bool {
        self.poll_interval.is_some()
    }

    async fn watch(&self, tx: WatchTx) -> Result<(), ConfigError> {
        let interval = self
            .poll_interval
            .ok_or_else(|| schema_invalid("remote", "poll_interval not configured"))?;

        let mut guard_slot = self.guard.lock();
        if guard_slot.is_some() {
            // The polling task is started at most once per provider.
            return Ok(());
        }
        *self.shared.notify.lock() = Some(tx);

        let shared = self.shared.clone();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = tokio::time::sleep(interval) => {
                        if let Err(err) = shared.poll_once().await {
                            shared.stats.record_poll_error();
                            tracing::warn!(
                                target: "nimbus::config",
                                "remote poll failed: {err:?}; keeping last snapshot",
                            );
                        }
                    }
                }
            }
        });

        *guard_slot = Some(PollGuard {
            cancel: Some(stop_tx),
            task: Some(task),
        });
        Ok(())
    }
}

pub struct PollGuard {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollGuard {
    pub async fn shutdown(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[derive(Clone, Default)]
pub struct ProviderStats {
    inner: Arc<StatsInner>,
}

#[derive(Default)]
struct StatsInner {
    polls: AtomicU64,
    reloads: AtomicU64,
    poll_errors: AtomicU64,
}

impl ProviderStats {
    pub fn record_poll(&self) {
        self.inner.polls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reload(&self) {
        self.inner.reloads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_error(&self) {
        self.inner.poll_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProviderStatsSnapshot {
        ProviderStatsSnapshot {
            polls: self.inner.polls.load(Ordering::Relaxed),
            reloads: self.inner.reloads.load(Ordering::Relaxed),
            poll_errors: self.inner.poll_errors.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for ProviderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("ProviderStats")
            .field("polls", &snapshot.polls)
            .field("reloads", &snapshot.reloads)
            .field("poll_errors", &snapshot.poll_errors)
            .finish()
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderStatsSnapshot {
    pub polls: u64,
    pub reloads: u64,
    pub poll_errors: u64,
}
