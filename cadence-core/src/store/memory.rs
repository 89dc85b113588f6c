//! In-memory `EventStore` backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CadenceError, CadenceResult};
use crate::event::Event;

use super::{EventFilter, EventStore};

/// Process-local store over a `HashMap`. Each operation takes the lock once;
/// multi-step mutations are serialized above this layer, per series.
#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<String, Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records. Test and diagnostics helper.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create(&self, event: Event) -> CadenceResult<Event> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(CadenceError::Store(format!(
                "duplicate event id: {}",
                event.id
            )));
        }
        events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn get(&self, id: &str) -> CadenceResult<Option<Event>> {
        Ok(self.events.read().await.get(id).cloned())
    }

    async fn find(&self, filter: &EventFilter) -> CadenceResult<Vec<Event>> {
        let events = self.events.read().await;
        let mut matched: Vec<Event> = events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; keep results deterministic.
        matched.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn save(&self, event: &Event) -> CadenceResult<()> {
        let mut events = self.events.write().await;
        match events.get_mut(&event.id) {
            Some(slot) => {
                *slot = event.clone();
                Ok(())
            }
            None => Err(CadenceError::NotFound(event.id.clone())),
        }
    }

    async fn delete(&self, id: &str) -> CadenceResult<bool> {
        Ok(self.events.write().await.remove(id).is_some())
    }

    async fn delete_where(&self, filter: &EventFilter) -> CadenceResult<u64> {
        let mut events = self.events.write().await;
        let doomed: Vec<String> = events
            .values()
            .filter(|event| filter.matches(event))
            .map(|event| event.id.clone())
            .collect();
        for id in &doomed {
            events.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}
