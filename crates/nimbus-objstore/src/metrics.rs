use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct StoreStats {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    heads: AtomicU64,
    gets: AtomicU64,
}

impl StoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_head(&self) {
        self.inner.heads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_get(&self) {
        self.inner.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StoreStatsSnapshot {
        StoreStatsSnapshot {
            heads: self.inner.heads.load(Ordering::Relaxed),
            gets: self.inner.gets.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("StoreStats")
            .field("heads", &snapshot.heads)
            .field("gets", &snapshot.gets)
            .finish()
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreStatsSnapshot {
    pub heads: u64,
    pub gets: u64,
}
