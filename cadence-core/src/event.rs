//! Event types for recurring calendar series.
//!
//! A series is one *base* event (`parent_event == None`, recurrence set)
//! plus zero or more *overrides* (`parent_event == Some(base id)`), each
//! representing a single occurrence that was edited or cancelled. A base
//! with `Recurrence::None` and no overrides is a plain standalone event.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often a base event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
    Monthly,
}

/// How far a mutation propagates across a series.
///
/// Also stored on override records (as `recurrence_update_option`) to tag
/// how the override was produced; `AllEvents` never appears on a stored
/// record because that scope mutates the base in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateScope {
    ThisEvent,
    ThisAndFollowing,
    AllEvents,
}

/// A calendar event record. The sole persisted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    /// `start_time <= end_time` is expected but not enforced here;
    /// ordering is a caller concern.
    pub end_time: DateTime<Utc>,
    /// Participant user ids. A set: unique, order irrelevant.
    pub participants: BTreeSet<String>,
    /// Creating user id. Immutable after creation.
    pub creator: String,
    pub recurrence: Recurrence,
    /// Back-reference to the series base. `Some` marks this record as an
    /// override; the base does not own the override's lifetime, so a base
    /// can be deleted while overrides remain (orphans, dropped by listing).
    pub parent_event: Option<String>,
    /// Tag recording which scope produced this override; `None` on bases.
    pub recurrence_update_option: Option<UpdateScope>,
    /// When true on an override, the occurrence is skipped rather than
    /// edited (a cancellation tombstone).
    #[serde(default)]
    pub cancelled: bool,
}

impl Event {
    /// Create a new base event with a fresh id and no participants.
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        creator: impl Into<String>,
        recurrence: Recurrence,
    ) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            start_time,
            end_time,
            participants: BTreeSet::new(),
            creator: creator.into(),
            recurrence,
            parent_event: None,
            recurrence_update_option: None,
            cancelled: false,
        }
    }

    /// Whether this record is an override of some base event.
    pub fn is_override(&self) -> bool {
        self.parent_event.is_some()
    }

    /// Whether this record is a plain non-recurring event: no recurrence
    /// pattern and not part of any series.
    pub fn is_standalone(&self) -> bool {
        self.recurrence == Recurrence::None && self.parent_event.is_none()
    }

    /// Whether this record is the root of a recurring series.
    pub fn is_series_base(&self) -> bool {
        self.parent_event.is_none() && self.recurrence != Recurrence::None
    }

    /// The key its series is grouped under: the base id for overrides,
    /// the event's own id otherwise.
    pub fn series_key(&self) -> &str {
        self.parent_event.as_deref().unwrap_or(&self.id)
    }

    /// Apply a field patch in place. Absent fields are left untouched.
    pub fn apply_patch(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
    }
}

/// Optional field deltas for an update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}
