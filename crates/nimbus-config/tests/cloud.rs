use nimbus_config::prelude::*;
use nimbus_objstore::{MemoryObjectStore, ObjectStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn default_naming_from_project_and_environment() {
    let cloud = CloudEnv::from_parts(true, Some("acme".into()), "Production");
    assert_eq!(cloud.default_bucket().as_deref(), Some("acme-nimbus"));
    assert_eq!(cloud.default_object(), "appsettings.Production.json");

    let bare = CloudEnv::from_parts(true, None, "Development");
    assert_eq!(bare.default_bucket(), None);
    assert_eq!(bare.default_object(), "appsettings.Development.json");
}

#[test]
fn detect_reads_process_environment() {
    std::env::set_var(nimbus_config::cloud::CLOUD_INSTANCE_VAR, "instance-1");
    std::env::set_var(nimbus_config::cloud::CLOUD_PROJECT_VAR, "acme");

    let cloud = CloudEnv::detect("Staging");
    assert!(cloud.on_cloud);
    assert_eq!(cloud.project_id.as_deref(), Some("acme"));
    assert_eq!(cloud.environment, "Staging");

    std::env::remove_var(nimbus_config::cloud::CLOUD_INSTANCE_VAR);
    std::env::remove_var(nimbus_config::cloud::CLOUD_PROJECT_VAR);

    let off = CloudEnv::detect("Staging");
    assert!(!off.on_cloud);
    assert_eq!(off.project_id, None);
}

#[tokio::test]
async fn registration_is_noop_off_cloud() {
    let store = MemoryObjectStore::new();
    let cloud = CloudEnv::from_parts(false, Some("acme".into()), "Production");

    let mut sources: Vec<Arc<dyn Source>> = Vec::new();
    add_remote_source(
        &mut sources,
        Arc::new(store.clone()),
        &cloud,
        RemoteOptions::default(),
    )
    .await
    .expect("noop");

    assert!(sources.is_empty());
    assert_eq!(store.metrics().snapshot().heads, 0);
}

#[tokio::test]
async fn registration_appends_remote_source_on_cloud() {
    let store = MemoryObjectStore::new();
    store.put(
        "acme-nimbus",
        "appsettings.Production.json",
        serde_json::to_vec(&json!({"feature": {"enabled": "true"}})).unwrap(),
    );
    let cloud = CloudEnv::from_parts(true, Some("acme".into()), "Production");

    let mut sources: Vec<Arc<dyn Source>> = Vec::new();
    add_remote_source(
        &mut sources,
        Arc::new(store),
        &cloud,
        RemoteOptions::default().with_poll_interval(Duration::from_secs(60)),
    )
    .await
    .expect("register");
    assert_eq!(sources.len(), 1);

    let loader = Loader {
        sources,
        validator: Arc::new(BasicValidator),
    };
    let snapshot = loader.load_once().await.expect("snapshot");
    assert_eq!(
        snapshot.try_get("feature.enabled").as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn registration_fails_when_document_is_missing() {
    let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new());
    let cloud = CloudEnv::from_parts(true, Some("acme".into()), "Production");

    let mut sources: Vec<Arc<dyn Source>> = Vec::new();
    let err = add_remote_source(&mut sources, store, &cloud, RemoteOptions::default())
        .await
        .expect_err("startup must fail");
    assert!(format!("{err}").contains("STORAGE.NOT_FOUND"));
    assert!(sources.is_empty());
}

#[tokio::test]
async fn explicit_options_override_derived_names() {
    let store = MemoryObjectStore::new();
    store.put(
        "custom-bucket",
        "settings.json",
        serde_json::to_vec(&json!({"k": "v"})).unwrap(),
    );
    let cloud = CloudEnv::from_parts(true, Some("acme".into()), "Production");

    let mut sources: Vec<Arc<dyn Source>> = Vec::new();
    add_remote_source(
        &mut sources,
        Arc::new(store),
        &cloud,
        RemoteOptions::default()
            .with_bucket("custom-bucket")
            .with_object("settings.json"),
    )
    .await
    .expect("register");

    let loader = Loader {
        sources,
        validator: Arc::new(BasicValidator),
    };
    let snapshot = loader.load_once().await.expect("snapshot");
    assert_eq!(snapshot.try_get("k").as_deref(), Some("v"));
}
