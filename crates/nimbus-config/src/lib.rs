pub mod access;
pub mod cloud;
pub mod errors;
pub mod events;
pub mod flatten;
pub mod loader;
pub mod model;
pub mod observe;
pub mod prelude;
pub mod snapshot;
pub mod source;
pub mod switch;
pub mod validate;
pub mod watch;

pub use crate::cloud::{add_remote_source, CloudEnv, RemoteOptions};
pub use crate::errors::ConfigError;
pub use crate::flatten::FlatSnapshot;
pub use crate::loader::{Loader, WatchGuard};
pub use crate::snapshot::ConfigSnapshot;
pub use crate::source::remote::RemoteDocProvider;
pub use crate::source::{Source, SourceSnapshot};
pub use crate::switch::SnapshotSwitch;
