//! Request identity and the permission guard.

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, CadenceResult};
use crate::event::Event;

/// The authenticated caller, resolved once per request by the transport
/// layer. How it is authenticated is not this crate's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub is_admin: bool,
}

impl Identity {
    pub fn user(user_id: impl Into<String>) -> Self {
        Identity {
            user_id: user_id.into(),
            is_admin: false,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Identity {
            user_id: user_id.into(),
            is_admin: true,
        }
    }

    /// Whether this identity may mutate the given event: admins may edit
    /// anything, everyone else only what they created.
    pub fn can_edit(&self, event: &Event) -> bool {
        self.is_admin || self.user_id == event.creator
    }

    /// Guard used before every mutation. A denial never leaves a partial
    /// mutation behind because it is checked before any write.
    pub fn ensure_can_edit(&self, event: &Event) -> CadenceResult<()> {
        if self.can_edit(event) {
            Ok(())
        } else {
            Err(CadenceError::PermissionDenied {
                user: self.user_id.clone(),
                event: event.id.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Recurrence;
    use chrono::{TimeZone, Utc};

    fn make_event(creator: &str) -> Event {
        Event::new(
            "Review",
            Utc.with_ymd_and_hms(2025, 4, 1, 14, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 4, 1, 15, 0, 0).unwrap(),
            creator,
            Recurrence::None,
        )
    }

    #[test]
    fn test_creator_can_edit() {
        let event = make_event("u1");
        assert!(Identity::user("u1").can_edit(&event));
    }

    #[test]
    fn test_non_creator_cannot_edit() {
        let event = make_event("u1");
        let identity = Identity::user("u2");
        assert!(!identity.can_edit(&event));
        assert!(matches!(
            identity.ensure_can_edit(&event),
            Err(CadenceError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_admin_can_edit_anything() {
        let event = make_event("u1");
        assert!(Identity::admin("u2").can_edit(&event));
    }
}
