use nimbus_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct StoreError(pub Box<ErrorObj>);

impl StoreError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn not_found(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .user_msg("Object not found.")
                .dev_msg(msg),
        )
    }

    pub fn forbidden(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::AUTH_FORBIDDEN)
                .user_msg("Access denied.")
                .dev_msg(msg),
        )
    }

    pub fn unavailable(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::STORAGE_UNAVAILABLE)
                .user_msg("Storage backend is unavailable.")
                .dev_msg(msg),
        )
    }

    pub fn provider_unavailable(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Object store backend unavailable.")
                .dev_msg(msg),
        )
    }

    pub fn unknown(msg: &str) -> Self {
        Self::from_builder(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Internal object store error.")
                .dev_msg(msg),
        )
    }

    fn from_builder(builder: ErrorBuilder) -> Self {
        StoreError(Box::new(builder.build()))
    }
}

impl From<ErrorObj> for StoreError {
    fn from(value: ErrorObj) -> Self {
        StoreError(Box::new(value))
    }
}
