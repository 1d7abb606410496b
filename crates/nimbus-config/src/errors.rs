use nimbus_errors::prelude::*;
use nimbus_objstore::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct ConfigError(pub Box<ErrorObj>);

impl ConfigError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }
}

impl From<ErrorObj> for ConfigError {
    fn from(value: ErrorObj) -> Self {
        ConfigError(Box::new(value))
    }
}

impl From<StoreError> for ConfigError {
    fn from(value: StoreError) -> Self {
        ConfigError(value.0)
    }
}

pub fn schema_invalid(phase: &str, detail: &str) -> ConfigError {
    ConfigError(Box::new(
        ErrorBuilder::new(codes::SCHEMA_VALIDATION)
            .user_msg("Configuration is invalid.")
            .dev_msg(format!("{phase}: {detail}"))
            .build(),
    ))
}

pub fn parse_failed(bucket: &str, object: &str, detail: &str) -> ConfigError {
    ConfigError(Box::new(
        ErrorBuilder::new(codes::CONFIG_PARSE)
            .user_msg("Configuration document could not be parsed.")
            .dev_msg(format!("parse {bucket}/{object}: {detail}"))
            .meta_kv("bucket", serde_json::json!(bucket))
            .meta_kv("object", serde_json::json!(object))
            .build(),
    ))
}

pub fn io_provider_unavailable(phase: &str, detail: &str) -> ConfigError {
    ConfigError(Box::new(
        ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
            .user_msg("Configuration source is unavailable.")
            .dev_msg(format!("{phase}: {detail}"))
            .build(),
    ))
}

pub fn load_failed(bucket: &str, object: &str, cause: ErrorObj) -> ConfigError {
    ConfigError(Box::new(
        ErrorBuilder::new(cause.code)
            .user_msg("Remote configuration could not be loaded.")
            .dev_msg(format!(
                "load {bucket}/{object}: {}",
                cause.message_dev.as_deref().unwrap_or(&cause.message_user)
            ))
            .meta_kv("bucket", serde_json::json!(bucket))
            .meta_kv("object", serde_json::json!(object))
            .cause(CauseEntry {
                code: cause.code.0.to_string(),
                summary: cause.message_user.clone(),
                meta: Some(cause.meta.clone()),
            })
            .build(),
    ))
}
