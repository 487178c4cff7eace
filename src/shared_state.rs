use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::error::StoreError;
use crate::services::project_store::ProjectStore;

#[derive(Clone)]
pub struct AppState {
    /// Single project store, one writer at a time
    pub store: Arc<RwLock<ProjectStore>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: ProjectStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            started_at: Instant::now(),
        }
    }

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, ProjectStore>, StoreError> {
        self.store.read().map_err(|_| StoreError::Poisoned)
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, ProjectStore>, StoreError> {
        self.store.write().map_err(|_| StoreError::Poisoned)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
