use super::TableSnapshot;
use std::sync::Arc;

use futures_locks::RwLock;

/// Shared holder of the current snapshot.
///
/// The lock guards an `Arc`, so readers hold it only long enough to clone the pointer and
/// a writer only long enough to swap it. Nothing slow ever runs under the lock.
pub struct MultithreadedCache(RwLock<Arc<TableSnapshot>>);

impl Default for MultithreadedCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MultithreadedCache {
    pub fn new() -> Self {
        Self(RwLock::new(Arc::new(TableSnapshot::default())))
    }

    pub async fn get(&self) -> Arc<TableSnapshot> {
        Arc::clone(&*self.0.read().await)
    }

    pub async fn replace(&self, snapshot: TableSnapshot) {
        let snapshot = Arc::new(snapshot);
        let mut guard = self.0.write().await;
        *guard = snapshot;
    }
}
