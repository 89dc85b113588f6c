use std::sync::Arc;

use cadence_core::delete::DeleteEngine;
use cadence_core::locks::SeriesLocks;
use cadence_core::store::{EventStore, MemoryStore};
use cadence_core::update::UpdateEngine;

/// Shared application state: one store, one lock table, both engines.
/// The engines share the lock table so updates and deletes against the
/// same series serialize against each other.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub updates: Arc<UpdateEngine>,
    pub deletes: Arc<DeleteEngine>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn EventStore>) -> Self {
        let locks = SeriesLocks::new();
        AppState {
            updates: Arc::new(UpdateEngine::new(store.clone(), locks.clone())),
            deletes: Arc::new(DeleteEngine::new(store.clone(), locks)),
            store,
        }
    }
}
