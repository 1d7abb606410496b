use async_trait::async_trait;
use bytes::Bytes;
use nimbus_config::prelude::*;
use nimbus_objstore::{MemoryObjectStore, ObjectMeta, ObjectStore, StoreError};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const BUCKET: &str = "acme-nimbus";
const OBJECT: &str = "appsettings.Production.json";

fn body(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

async fn connect_with_interval(
    store: Arc<dyn ObjectStore>,
    interval: Duration,
) -> Arc<RemoteDocProvider> {
    let provider = RemoteDocProvider::connect(store, BUCKET, OBJECT)
        .await
        .expect("connect")
        .with_poll_interval(interval);
    Arc::new(provider)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn polling_reloads_on_fingerprint_change_only() {
    let store = MemoryObjectStore::new();
    store.put(BUCKET, OBJECT, body(json!({"app": {"version": "1"}})));

    let provider =
        connect_with_interval(Arc::new(store.clone()), Duration::from_millis(25)).await;

    let loader = Arc::new(Loader {
        sources: vec![provider.clone() as Arc<dyn Source>],
        validator: Arc::new(BasicValidator),
    });
    let (switch, guard) = loader.load_and_watch().await.expect("watch");

    let version: String = switch
        .get()
        .get(&KeyPath::new("app.version"))
        .expect("initial");
    assert_eq!(version, "1");

    // Several ticks with an unchanged fingerprint: no reload, no swap.
    tokio::time::sleep(Duration::from_millis(120)).await;
    let stats = provider.stats().snapshot();
    assert!(stats.polls >= 2);
    assert_eq!(stats.reloads, 0);

    store.put(BUCKET, OBJECT, body(json!({"app": {"version": "2"}})));
    tokio::time::sleep(Duration::from_millis(120)).await;

    let version: String = switch
        .get()
        .get(&KeyPath::new("app.version"))
        .expect("updated");
    assert_eq!(version, "2");
    assert_eq!(provider.stats().snapshot().reloads, 1);

    provider.shutdown().await;
    guard.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reloading_identical_content_is_stable() {
    let store = MemoryObjectStore::new();
    let doc = json!({"a": {"b": "1"}, "c": ["x", "y"]});
    store.put(BUCKET, OBJECT, body(doc.clone()));

    let provider =
        connect_with_interval(Arc::new(store.clone()), Duration::from_millis(25)).await;
    let before = provider.snapshot();

    // Rewrite the same content: fingerprint moves, flattened content doesn't.
    let (tx, _rx) = futures::channel::mpsc::channel(8);
    provider.watch(tx).await.expect("watch");
    store.put(BUCKET, OBJECT, body(doc));
    tokio::time::sleep(Duration::from_millis(120)).await;

    let after = provider.snapshot();
    assert!(provider.stats().snapshot().reloads >= 1);
    assert_eq!(before.entries(), after.entries());
    assert_eq!(before.checksum(), after.checksum());

    provider.shutdown().await;
}

struct FlakyStore {
    inner: MemoryObjectStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::unavailable("injected outage"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn head(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
        self.check()?;
        self.inner.head(bucket, key).await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, StoreError> {
        self.check()?;
        self.inner.get(bucket, key).await
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn poll_errors_do_not_stop_the_loop() {
    let memory = MemoryObjectStore::new();
    memory.put(BUCKET, OBJECT, body(json!({"flag": "off"})));
    let store = Arc::new(FlakyStore {
        inner: memory.clone(),
        failing: AtomicBool::new(false),
    });

    let provider = connect_with_interval(store.clone(), Duration::from_millis(25)).await;
    let (tx, _rx) = futures::channel::mpsc::channel(8);
    provider.watch(tx).await.expect("watch");

    store.failing.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(120)).await;
    let during_outage = provider.stats().snapshot();
    assert!(during_outage.poll_errors >= 2);
    assert_eq!(provider.try_get("flag").as_deref(), Some("off"));

    // Outage over: the very next tick picks up the pending change.
    store.failing.store(false, Ordering::SeqCst);
    memory.put(BUCKET, OBJECT, body(json!({"flag": "on"})));
    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(provider.try_get("flag").as_deref(), Some("on"));
    let after = provider.stats().snapshot();
    assert!(after.polls > during_outage.polls);
    assert_eq!(after.reloads, 1);

    provider.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_stops_all_fetches() {
    let store = MemoryObjectStore::new();
    store.put(BUCKET, OBJECT, body(json!({"k": "v"})));

    let provider =
        connect_with_interval(Arc::new(store.clone()), Duration::from_millis(20)).await;
    let (tx, _rx) = futures::channel::mpsc::channel(8);
    provider.watch(tx).await.expect("watch");

    tokio::time::sleep(Duration::from_millis(90)).await;
    provider.shutdown().await;

    let at_shutdown = store.metrics().snapshot();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(store.metrics().snapshot(), at_shutdown);

    // The last snapshot stays readable after the loop is gone.
    assert_eq!(provider.try_get("k").as_deref(), Some("v"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_observe_a_partial_swap() {
    let store = MemoryObjectStore::new();
    store.put(
        BUCKET,
        OBJECT,
        body(json!({"a": "gen0", "b": "gen0", "c": "gen0"})),
    );

    let provider = connect_with_interval(Arc::new(store.clone()), Duration::from_millis(5)).await;
    let (tx, _rx) = futures::channel::mpsc::channel(8);
    provider.watch(tx).await.expect("watch");

    let reader = {
        let provider = provider.clone();
        tokio::spawn(async move {
            for _ in 0..2_000 {
                let snapshot = provider.snapshot();
                let a = snapshot.get("a").expect("a");
                assert_eq!(snapshot.get("b"), Some(a), "torn snapshot");
                assert_eq!(snapshot.get("c"), Some(a), "torn snapshot");
                tokio::task::yield_now().await;
            }
        })
    };

    for generation in 1..=20u32 {
        let value = format!("gen{generation}");
        store.put(
            BUCKET,
            OBJECT,
            body(json!({"a": &value, "b": &value, "c": &value})),
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    reader.await.expect("reader");
    provider.shutdown().await;
}
