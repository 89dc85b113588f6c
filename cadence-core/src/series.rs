//! Resolving an event to the base of its series.

use crate::error::{CadenceError, CadenceResult};
use crate::event::Event;
use crate::store::EventStore;

/// Find the base event of the series `event` belongs to. For overrides this
/// follows `parent_event`; for anything else the event is its own base.
///
/// `BaseNotFound` means the back-reference no longer resolves: either the
/// base was deleted out from under its overrides or a concurrent delete
/// raced this read.
pub async fn resolve_base(store: &dyn EventStore, event: &Event) -> CadenceResult<Event> {
    match &event.parent_event {
        Some(base_id) => store
            .get(base_id)
            .await?
            .ok_or_else(|| CadenceError::BaseNotFound(base_id.clone())),
        None => Ok(event.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Recurrence;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn make_base() -> Event {
        Event::new(
            "Retro",
            Utc.with_ymd_and_hms(2025, 7, 7, 16, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 7, 7, 17, 0, 0).unwrap(),
            "u1",
            Recurrence::Monthly,
        )
    }

    #[tokio::test]
    async fn test_base_resolves_to_itself() {
        let store = MemoryStore::new();
        let base = store.create(make_base()).await.unwrap();

        let resolved = resolve_base(&store, &base).await.unwrap();
        assert_eq!(resolved.id, base.id);
    }

    #[tokio::test]
    async fn test_override_resolves_to_parent() {
        let store = MemoryStore::new();
        let base = store.create(make_base()).await.unwrap();

        let mut ov = make_base();
        ov.recurrence = Recurrence::None;
        ov.parent_event = Some(base.id.clone());
        let ov = store.create(ov).await.unwrap();

        let resolved = resolve_base(&store, &ov).await.unwrap();
        assert_eq!(resolved.id, base.id);
    }

    #[tokio::test]
    async fn test_orphan_override_is_base_not_found() {
        let store = MemoryStore::new();
        let mut orphan = make_base();
        orphan.recurrence = Recurrence::None;
        orphan.parent_event = Some("gone".into());

        let err = resolve_base(&store, &orphan).await.unwrap_err();
        assert!(matches!(err, CadenceError::BaseNotFound(_)));
    }
}
