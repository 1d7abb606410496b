use nimbus_errors::prelude::*;
use serde_json::json;

#[test]
fn build_and_render_public() {
    let err = ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
        .user_msg("Object not found.")
        .dev_msg("head: appsettings.Production.json missing")
        .meta_kv("bucket", json!("acme-nimbus"))
        .correlation("req-123")
        .build();

    let public_view = err.to_public();
    assert_eq!(public_view.code, "STORAGE.NOT_FOUND");
    assert_eq!(public_view.message, "Object not found.");
    assert_eq!(public_view.correlation_id.as_deref(), Some("req-123"));

    let labels = labels(&err);
    assert_eq!(labels.get("code").unwrap(), "STORAGE.NOT_FOUND");
    assert_eq!(labels.get("bucket").unwrap(), "\"acme-nimbus\"");
}

#[test]
fn registry_resolves_every_code() {
    for code in [
        codes::AUTH_FORBIDDEN,
        codes::SCHEMA_VALIDATION,
        codes::CONFIG_PARSE,
        codes::PROVIDER_UNAVAILABLE,
        codes::STORAGE_NOT_FOUND,
        codes::STORAGE_UNAVAILABLE,
        codes::UNKNOWN_INTERNAL,
    ] {
        let spec = spec_of(code);
        assert_eq!(spec.code, code);
        assert!(!spec.default_user_msg.is_empty());
    }
}

#[test]
fn parse_failures_are_permanent() {
    let err = ErrorBuilder::new(codes::CONFIG_PARSE).build();
    assert_eq!(err.retryable, RetryClass::Permanent);
    assert_eq!(err.http_status, 422);

    let audit = err.to_audit();
    assert_eq!(audit.kind, "Parse");
    assert_eq!(audit.severity, "error");
}
