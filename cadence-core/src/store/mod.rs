//! Event persistence abstraction.
//!
//! The production document store is an external collaborator; the engines
//! only depend on the `EventStore` trait and receive it as an injected
//! `Arc<dyn EventStore>`. The crate ships one backend, [`MemoryStore`],
//! used by the server default and by tests.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CadenceResult;
use crate::event::Event;

/// A conjunction of optional predicates over stored events. Absent fields
/// match everything; `matches` is pure so the filter semantics can be
/// tested without a store.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Event is visible to this user: they created it or participate in it.
    pub visible_to: Option<String>,
    /// Record is either the named record itself or an override of the named
    /// base: `id == .0 || parent_event == .1`.
    pub record_or_override_of: Option<(String, String)>,
    /// Record is an override of this base: `parent_event == X`.
    pub override_of: Option<String>,
    /// `start_time >= cutoff`.
    pub starts_at_or_after: Option<DateTime<Utc>>,
    /// Record carries a `recurrence_update_option` tag. True base records
    /// and untagged overrides never match when this is set.
    pub tagged_only: bool,
}

impl EventFilter {
    /// Everything a user can see: events they created or participate in.
    pub fn visible_to(user_id: impl Into<String>) -> Self {
        EventFilter {
            visible_to: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// The whole series rooted at `base_id`: the base record plus every
    /// override of it.
    pub fn series(base_id: &str) -> Self {
        EventFilter {
            record_or_override_of: Some((base_id.to_string(), base_id.to_string())),
            ..Default::default()
        }
    }

    /// Only the overrides of `base_id`, not the base itself.
    pub fn overrides_of(base_id: &str) -> Self {
        EventFilter {
            override_of: Some(base_id.to_string()),
            ..Default::default()
        }
    }

    /// The scoped sweep used by `thisAndFollowing`: the target record or any
    /// override of the base, starting at or after the cutoff, restricted to
    /// tagged records.
    pub fn series_cutoff(target_id: &str, base_id: &str, cutoff: DateTime<Utc>) -> Self {
        EventFilter {
            record_or_override_of: Some((target_id.to_string(), base_id.to_string())),
            starts_at_or_after: Some(cutoff),
            tagged_only: true,
            ..Default::default()
        }
    }

    /// Whether the event satisfies every present predicate.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(user) = &self.visible_to {
            if event.creator != *user && !event.participants.contains(user) {
                return false;
            }
        }
        if let Some((record_id, base_id)) = &self.record_or_override_of {
            let in_series =
                event.id == *record_id || event.parent_event.as_deref() == Some(base_id);
            if !in_series {
                return false;
            }
        }
        if let Some(base_id) = &self.override_of {
            if event.parent_event.as_deref() != Some(base_id.as_str()) {
                return false;
            }
        }
        if let Some(cutoff) = self.starts_at_or_after {
            if event.start_time < cutoff {
                return false;
            }
        }
        if self.tagged_only && event.recurrence_update_option.is_none() {
            return false;
        }
        true
    }
}

/// Persistence operations the engines need. Backends map failures of their
/// own machinery to `CadenceError::Store`; they never retry.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new record under its id.
    async fn create(&self, event: Event) -> CadenceResult<Event>;

    /// Fetch a record by id. `Ok(None)` when absent.
    async fn get(&self, id: &str) -> CadenceResult<Option<Event>>;

    /// Fetch every record matching the filter.
    async fn find(&self, filter: &EventFilter) -> CadenceResult<Vec<Event>>;

    /// Save an existing record in place. `NotFound` if the id is absent.
    async fn save(&self, event: &Event) -> CadenceResult<()>;

    /// Delete one record by id. Returns whether a record was removed.
    async fn delete(&self, id: &str) -> CadenceResult<bool>;

    /// Delete every record matching the filter; returns how many went.
    async fn delete_where(&self, filter: &EventFilter) -> CadenceResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Recurrence, UpdateScope};
    use chrono::TimeZone;

    fn make_event(id: &str, creator: &str) -> Event {
        let mut event = Event::new(
            "Planning",
            Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 5, 11, 0, 0).unwrap(),
            creator,
            Recurrence::Weekly,
        );
        event.id = id.to_string();
        event
    }

    #[test]
    fn test_visible_to_creator_or_participant() {
        let mut event = make_event("e1", "u1");
        event.participants.insert("u2".into());

        assert!(EventFilter::visible_to("u1").matches(&event));
        assert!(EventFilter::visible_to("u2").matches(&event));
        assert!(!EventFilter::visible_to("u3").matches(&event));
    }

    #[test]
    fn test_series_matches_base_and_overrides() {
        let base = make_event("base", "u1");
        let mut ov = make_event("ov", "u1");
        ov.parent_event = Some("base".into());
        let unrelated = make_event("other", "u1");

        let filter = EventFilter::series("base");
        assert!(filter.matches(&base));
        assert!(filter.matches(&ov));
        assert!(!filter.matches(&unrelated));

        let overrides = EventFilter::overrides_of("base");
        assert!(!overrides.matches(&base));
        assert!(overrides.matches(&ov));
    }

    #[test]
    fn test_series_cutoff_skips_untagged_and_earlier_records() {
        let cutoff = Utc.with_ymd_and_hms(2025, 5, 5, 10, 0, 0).unwrap();
        let filter = EventFilter::series_cutoff("target", "base", cutoff);

        // Tagged override at the cutoff: swept.
        let mut tagged = make_event("ov1", "u1");
        tagged.parent_event = Some("base".into());
        tagged.recurrence_update_option = Some(UpdateScope::ThisEvent);
        assert!(filter.matches(&tagged));

        // Same override before the cutoff: kept.
        let mut earlier = tagged.clone();
        earlier.id = "ov0".into();
        earlier.start_time = cutoff - chrono::Duration::days(7);
        assert!(!filter.matches(&earlier));

        // Untagged base record, even when it is the target: kept.
        let mut base = make_event("target", "u1");
        base.recurrence_update_option = None;
        assert!(!filter.matches(&base));
    }
}
