use nimbus_objstore::prelude::*;

#[tokio::test]
async fn memory_head_get_roundtrip() {
    let store = MemoryObjectStore::new();
    store.put("acme-nimbus", "appsettings.Production.json", &b"{\"ok\":true}"[..]);

    let head = store
        .head("acme-nimbus", "appsettings.Production.json")
        .await
        .expect("head");
    assert_eq!(head.bucket, "acme-nimbus");
    assert_eq!(head.size, 11);
    assert!(head.etag.is_some());

    let body = store
        .get("acme-nimbus", "appsettings.Production.json")
        .await
        .expect("get");
    assert_eq!(&body[..], b"{\"ok\":true}");

    store.remove("acme-nimbus", "appsettings.Production.json");
    let err = store
        .get("acme-nimbus", "appsettings.Production.json")
        .await
        .expect_err("removed");
    assert!(format!("{err}").contains("STORAGE.NOT_FOUND"));

    let snapshot = store.metrics().snapshot();
    assert_eq!(snapshot.heads, 1);
    assert_eq!(snapshot.gets, 2);
}

#[tokio::test]
async fn memory_put_always_advances_fingerprint() {
    let store = MemoryObjectStore::new();
    store.put("b", "k", &b"one"[..]);
    let first = store.head("b", "k").await.expect("head").updated_ms;

    store.put("b", "k", &b"one"[..]);
    let second = store.head("b", "k").await.expect("head").updated_ms;
    assert!(second > first);
}

#[tokio::test]
async fn fs_head_get_and_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let bucket_dir = tmp.path().join("local");
    std::fs::create_dir_all(&bucket_dir).unwrap();
    std::fs::write(bucket_dir.join("appsettings.Development.json"), b"{\"a\":1}").unwrap();

    let store = FsObjectStore::new(tmp.path());
    let head = store
        .head("local", "appsettings.Development.json")
        .await
        .expect("head");
    assert_eq!(head.size, 7);
    assert!(head.updated_ms > 0);

    let body = store
        .get("local", "appsettings.Development.json")
        .await
        .expect("get");
    assert_eq!(&body[..], b"{\"a\":1}");

    let err = store.head("local", "nope.json").await.expect_err("missing");
    assert!(format!("{err}").contains("STORAGE.NOT_FOUND"));
}
