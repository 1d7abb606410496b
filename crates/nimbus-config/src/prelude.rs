pub use crate::{
    cloud::{add_remote_source, CloudEnv, RemoteOptions},
    errors::ConfigError,
    events::{ConfigErrorEvent, ConfigUpdateEvent},
    flatten::FlatSnapshot,
    loader::{Loader, WatchGuard},
    model::{Checksum, KeyPath, Layer, SnapshotVersion},
    snapshot::ConfigSnapshot,
    source::{
        remote::{PollGuard, ProviderStats, ProviderStatsSnapshot, RemoteDocProvider},
        Source, SourceSnapshot,
    },
    switch::SnapshotSwitch,
    validate::{BasicValidator, Validator},
    watch::{ChangeNotice, WatchTx},
};
