//! The three delete scopes for recurring series.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CadenceError, CadenceResult};
use crate::event::{Event, Recurrence, UpdateScope};
use crate::identity::Identity;
use crate::locks::SeriesLocks;
use crate::series::resolve_base;
use crate::store::{EventFilter, EventStore};

/// What a delete actually did. Deleting one occurrence of a live series
/// does not remove anything; it leaves a cancellation tombstone behind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DeleteOutcome {
    /// The record itself was removed (standalone event or override).
    Removed,
    /// A tombstone override was created; the base is untouched.
    Cancelled { tombstone: Event },
    /// The series was cut off at the target's start time.
    Truncated { removed: u64 },
    /// The base and all of its overrides are gone.
    SeriesRemoved { removed: u64 },
}

/// Applies deletes at one of the three scopes, mirroring `UpdateEngine`.
pub struct DeleteEngine {
    store: Arc<dyn EventStore>,
    locks: SeriesLocks,
}

impl DeleteEngine {
    pub fn new(store: Arc<dyn EventStore>, locks: SeriesLocks) -> Self {
        DeleteEngine { store, locks }
    }

    pub async fn delete(
        &self,
        identity: &Identity,
        event_id: &str,
        scope: UpdateScope,
    ) -> CadenceResult<DeleteOutcome> {
        let target = self
            .store
            .get(event_id)
            .await?
            .ok_or_else(|| CadenceError::NotFound(event_id.to_string()))?;

        let _series = self.locks.acquire(target.series_key()).await;
        let target = self
            .store
            .get(event_id)
            .await?
            .ok_or_else(|| CadenceError::NotFound(event_id.to_string()))?;

        debug!(event = %target.id, ?scope, "applying delete");

        match scope {
            UpdateScope::ThisEvent => self.delete_this_event(identity, target).await,
            UpdateScope::ThisAndFollowing => self.delete_this_and_following(identity, target).await,
            UpdateScope::AllEvents => self.delete_all_events(identity, target).await,
        }
    }

    /// `thisEvent`: standalone events and overrides are hard-deleted; one
    /// occurrence of a live series is cancelled with a tombstone instead,
    /// leaving the base untouched.
    async fn delete_this_event(
        &self,
        identity: &Identity,
        target: Event,
    ) -> CadenceResult<DeleteOutcome> {
        identity.ensure_can_edit(&target)?;

        if target.is_standalone() || target.is_override() {
            self.store.delete(&target.id).await?;
            return Ok(DeleteOutcome::Removed);
        }

        let mut tombstone = target.clone();
        tombstone.id = Uuid::new_v4().to_string();
        tombstone.recurrence = Recurrence::None;
        tombstone.parent_event = Some(target.id.clone());
        tombstone.recurrence_update_option = Some(UpdateScope::ThisEvent);
        tombstone.cancelled = true;

        debug!(base = %target.id, "cancelling occurrence with tombstone");
        let tombstone = self.store.create(tombstone).await?;
        Ok(DeleteOutcome::Cancelled { tombstone })
    }

    /// `thisAndFollowing`: sweep tagged records from the target's start time
    /// on (same filter as the update split), then terminate the base.
    async fn delete_this_and_following(
        &self,
        identity: &Identity,
        target: Event,
    ) -> CadenceResult<DeleteOutcome> {
        let mut base = resolve_base(self.store.as_ref(), &target).await?;
        identity.ensure_can_edit(&base)?;

        let removed = self
            .store
            .delete_where(&EventFilter::series_cutoff(
                &target.id,
                &base.id,
                target.start_time,
            ))
            .await?;

        base.recurrence = Recurrence::None;
        self.store.save(&base).await?;

        debug!(base = %base.id, removed, "truncated series");
        Ok(DeleteOutcome::Truncated { removed })
    }

    /// `allEvents`: one sweep removes the base and every override of it.
    async fn delete_all_events(
        &self,
        identity: &Identity,
        target: Event,
    ) -> CadenceResult<DeleteOutcome> {
        let base = resolve_base(self.store.as_ref(), &target).await?;
        identity.ensure_can_edit(&base)?;

        let removed = self
            .store
            .delete_where(&EventFilter::series(&base.id))
            .await?;

        debug!(base = %base.id, removed, "removed whole series");
        Ok(DeleteOutcome::SeriesRemoved { removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone, Utc};

    fn engine(store: &Arc<MemoryStore>) -> DeleteEngine {
        DeleteEngine::new(store.clone() as Arc<dyn EventStore>, SeriesLocks::new())
    }

    fn make_daily_base() -> Event {
        Event::new(
            "Focus block",
            Utc.with_ymd_and_hms(2025, 9, 1, 13, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 9, 1, 14, 0, 0).unwrap(),
            "u1",
            Recurrence::Daily,
        )
    }

    fn make_override(base: &Event, id: &str, offset_days: i64) -> Event {
        let mut ov = base.clone();
        ov.id = id.to_string();
        ov.recurrence = Recurrence::None;
        ov.parent_event = Some(base.id.clone());
        ov.recurrence_update_option = Some(UpdateScope::ThisEvent);
        ov.start_time = base.start_time + Duration::days(offset_days);
        ov.end_time = base.end_time + Duration::days(offset_days);
        ov
    }

    #[tokio::test]
    async fn test_this_event_on_standalone_hard_deletes() {
        let store = Arc::new(MemoryStore::new());
        let mut standalone = make_daily_base();
        standalone.recurrence = Recurrence::None;
        let standalone = store.create(standalone).await.unwrap();

        let outcome = engine(&store)
            .delete(&Identity::user("u1"), &standalone.id, UpdateScope::ThisEvent)
            .await
            .unwrap();

        assert!(matches!(outcome, DeleteOutcome::Removed));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_this_event_on_base_leaves_tombstone() {
        let store = Arc::new(MemoryStore::new());
        let base = store.create(make_daily_base()).await.unwrap();

        let outcome = engine(&store)
            .delete(&Identity::user("u1"), &base.id, UpdateScope::ThisEvent)
            .await
            .unwrap();

        let DeleteOutcome::Cancelled { tombstone } = outcome else {
            panic!("expected a tombstone");
        };
        assert!(tombstone.cancelled);
        assert_eq!(tombstone.parent_event.as_deref(), Some(base.id.as_str()));
        assert_eq!(tombstone.recurrence, Recurrence::None);
        assert_eq!(
            tombstone.recurrence_update_option,
            Some(UpdateScope::ThisEvent)
        );

        // Base untouched, two records now.
        assert_eq!(store.get(&base.id).await.unwrap().unwrap(), base);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_this_event_on_override_hard_deletes() {
        let store = Arc::new(MemoryStore::new());
        let base = store.create(make_daily_base()).await.unwrap();
        let ov = store.create(make_override(&base, "ov", 2)).await.unwrap();

        let outcome = engine(&store)
            .delete(&Identity::user("u1"), &ov.id, UpdateScope::ThisEvent)
            .await
            .unwrap();

        assert!(matches!(outcome, DeleteOutcome::Removed));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_this_and_following_truncates_series() {
        let store = Arc::new(MemoryStore::new());
        let base = store.create(make_daily_base()).await.unwrap();
        let past = store.create(make_override(&base, "past", 1)).await.unwrap();
        let future = store
            .create(make_override(&base, "future", 5))
            .await
            .unwrap();

        let outcome = engine(&store)
            .delete(&Identity::user("u1"), &future.id, UpdateScope::ThisAndFollowing)
            .await
            .unwrap();

        assert!(matches!(outcome, DeleteOutcome::Truncated { removed: 1 }));
        assert!(store.get(&future.id).await.unwrap().is_none());
        // Records strictly before the cutoff survive.
        assert!(store.get(&past.id).await.unwrap().is_some());
        assert_eq!(
            store.get(&base.id).await.unwrap().unwrap().recurrence,
            Recurrence::None
        );
    }

    #[tokio::test]
    async fn test_all_events_removes_base_and_overrides() {
        let store = Arc::new(MemoryStore::new());
        let base = store.create(make_daily_base()).await.unwrap();
        store.create(make_override(&base, "ov1", 1)).await.unwrap();
        let mut tomb = make_override(&base, "tomb", 2);
        tomb.cancelled = true;
        store.create(tomb).await.unwrap();

        let outcome = engine(&store)
            .delete(&Identity::user("u1"), "ov1", UpdateScope::AllEvents)
            .await
            .unwrap();

        assert!(matches!(outcome, DeleteOutcome::SeriesRemoved { removed: 3 }));
        assert!(store.is_empty().await);
        assert!(
            store
                .find(&EventFilter::series(&base.id))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_denied_delete_leaves_storage_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let base = store.create(make_daily_base()).await.unwrap();

        let err = engine(&store)
            .delete(&Identity::user("intruder"), &base.id, UpdateScope::AllEvents)
            .await
            .unwrap_err();

        assert!(matches!(err, CadenceError::PermissionDenied { .. }));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&base.id).await.unwrap().unwrap(), base);
    }

    #[tokio::test]
    async fn test_delete_missing_event_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let err = engine(&store)
            .delete(&Identity::user("u1"), "nope", UpdateScope::ThisEvent)
            .await
            .unwrap_err();
        assert!(matches!(err, CadenceError::NotFound(_)));
    }
}
