pub use crate::errors::StoreError;
pub use crate::fs::FsObjectStore;
pub use crate::gcs::GcsObjectStore;
pub use crate::memory::MemoryObjectStore;
pub use crate::metrics::{StoreStats, StoreStatsSnapshot};
pub use crate::model::ObjectMeta;
pub use crate::r#trait::ObjectStore;
