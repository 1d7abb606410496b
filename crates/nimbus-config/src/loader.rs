use crate::{
    errors::ConfigError,
    events::ConfigUpdateEvent,
    model::{ConfigMap, ProvenanceEntry, SnapshotVersion},
    snapshot::ConfigSnapshot,
    source::Source,
    switch::SnapshotSwitch,
    validate::Validator,
    watch::ChangeNotice,
};
use chrono::Utc;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Layered composition of configuration sources, in registration order.
pub struct Loader {
    pub sources: Vec<Arc<dyn Source>>,
    pub validator: Arc<dyn Validator>,
}

impl Loader {
    pub async fn load_once(&self) -> Result<ConfigSnapshot, ConfigError> {
        let (map, provenance) = self.materialize().await?;
        let tree = serde_json::Value::Object(map);
        self.validator.validate_boot(&tree).await?;

        Ok(ConfigSnapshot::from_tree(
            tree,
            SnapshotVersion("v1".into()),
            provenance,
        ))
    }

    /// Materializes the initial snapshot, wires every watch-capable source
    /// into a supervisor task, and publishes reloads through the returned
    /// switch. A failed reload keeps the last snapshot; the supervisor only
    /// exits on shutdown or when every watch channel closes.
    pub async fn load_and_watch(
        self: Arc<Self>,
    ) -> Result<(Arc<SnapshotSwitch>, WatchGuard), ConfigError> {
        let initial = Arc::new(self.load_once().await?);
        let switch = Arc::new(SnapshotSwitch::new(initial));

        let (tx, rx) = futures::channel::mpsc::channel::<ChangeNotice>(32);

        for source in &self.sources {
            if source.supports_watch() {
                source.watch(tx.clone()).await?;
            }
        }

        drop(tx);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let loader = self.clone();
        let switch_arc = switch.clone();
        let mut stop = stop_rx.fuse();
        let mut rx_stream = rx.fuse();
        let task = tokio::spawn(async move {
            loop {
                futures::select! {
                    _ = stop => break,
                    notice = rx_stream.next() => {
                        let Some(notice) = notice else {
                            break;
                        };
                        let current = switch_arc.get();
                        match loader.load_once().await {
                            Ok(snapshot) => {
                                let snapshot = Arc::new(snapshot);
                                let event = ConfigUpdateEvent {
                                    source_id: notice.source_id,
                                    from_version: Some(current.version().clone()),
                                    to_version: snapshot.version().clone(),
                                    from_checksum: Some(current.checksum().clone()),
                                    to_checksum: snapshot.checksum().clone(),
                                    ts_ms: Utc::now().timestamp_millis(),
                                };
                                switch_arc.swap(snapshot);
                                tracing::debug!(
                                    target: "nimbus::config",
                                    "configuration reloaded: {event:?}",
                                );
                            }
                            Err(err) => {
                                tracing::warn!(
                                    target: "nimbus::config",
                                    "watch reload rejected: {err:?}; keeping last snapshot",
                                );
                            }
                        }
                    }
                }
            }
        });

        Ok((
            switch,
            WatchGuard {
                cancel: Some(stop_tx),
                task: Some(task),
            },
        ))
    }

    async fn materialize(&self) -> Result<(ConfigMap, Vec<ProvenanceEntry>), ConfigError> {
        let mut map = ConfigMap::new();
        let mut provenance = Vec::new();

        for source in &self.sources {
            let snapshot = source.load().await?;
            merge_into(&mut map, snapshot.map);
            provenance.extend(snapshot.provenance);
        }

        Ok((map, provenance))
    }
}

pub struct WatchGuard {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl WatchGuard {
    pub async fn shutdown(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn merge_into(dst: &mut ConfigMap, src: ConfigMap) {
    for (key, value) in src {
        match (dst.get_mut(&key), value) {
            (Some(serde_json::Value::Object(dst_obj)), serde_json::Value::Object(src_obj)) => {
                merge_object(dst_obj, src_obj);
            }
            (_, v) => {
                dst.insert(key, v);
            }
        }
    }
}

fn merge_object(
    dst: &mut serde_json::Map<String, serde_json::Value>,
    src: serde_json::Map<String, serde_json::Value>,
) {
    for (key, value) in src {
        match (dst.get_mut(&key), value) {
            (Some(serde_json::Value::Object(dst_obj)), serde_json::Value::Object(src_obj)) => {
                merge_object(dst_obj, src_obj);
            }
            (_, v) => {
                dst.insert(key, v);
            }
        }
    }
}
