pub mod errors;
pub mod fs;
pub mod gcs;
pub mod memory;
pub mod metrics;
pub mod model;
pub mod prelude;
pub mod r#trait;

pub use crate::errors::StoreError;
pub use crate::fs::FsObjectStore;
pub use crate::gcs::GcsObjectStore;
pub use crate::memory::MemoryObjectStore;
pub use crate::metrics::{StoreStats, StoreStatsSnapshot};
pub use crate::model::ObjectMeta;
pub use crate::r#trait::ObjectStore;
