use crate::errors::{schema_invalid, ConfigError};

#[async_trait::async_trait]
pub trait Validator: Send + Sync {
    async fn validate_boot(&self, tree: &serde_json::Value) -> Result<(), ConfigError>;
}

/// Shape check only: the materialized tree must be a JSON object. Runs on
/// boot and again on every reload.
pub struct BasicValidator;

#[async_trait::async_trait]
impl Validator for BasicValidator {
    async fn validate_boot(&self, tree: &serde_json::Value) -> Result<(), ConfigError> {
        if tree.is_object() {
            Ok(())
        } else {
            Err(schema_invalid(
                "boot",
                &format!("configuration root must be an object, got {tree:?}"),
            ))
        }
    }
}
