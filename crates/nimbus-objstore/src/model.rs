use serde::{Deserialize, Serialize};

/// Metadata fingerprint of one remote object, returned by `head` without
/// touching the body. `updated_ms` is the change-detection fingerprint:
/// equal for unchanged objects, eventually different after any write.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMeta {
    pub bucket: String,
    pub key: String,
    pub size: u64,
    pub etag: Option<String>,
    pub updated_ms: i64,
}
