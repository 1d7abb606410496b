use crate::model::{Checksum, SnapshotVersion};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigUpdateEvent {
    pub source_id: String,
    pub from_version: Option<SnapshotVersion>,
    pub to_version: SnapshotVersion,
    pub from_checksum: Option<Checksum>,
    pub to_checksum: Checksum,
    pub ts_ms: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigErrorEvent {
    pub phase: String,
    pub code: String,
    pub message_user: String,
}
