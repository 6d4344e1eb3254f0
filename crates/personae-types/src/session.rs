//! Request-scoped session context.
//!
//! Resolved once per request from headers and passed explicitly to the
//! services that need to know who is calling.

use serde::Serialize;
use uuid::Uuid;

use crate::guest::GuestId;
use crate::profile::{Profile, ProfileRole};

/// Who is making the current request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    /// No credentials at all. May browse agents but not chat.
    Anonymous,
    /// Unauthenticated visitor carrying a client-generated guest id.
    Guest { guest_id: GuestId },
    /// Signed-in user.
    Authenticated { profile: Profile },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Session::Authenticated { profile } => Some(profile),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.profile().map(|p| p.id)
    }

    pub fn guest_id(&self) -> Option<GuestId> {
        match self {
            Session::Guest { guest_id } => Some(*guest_id),
            _ => None,
        }
    }

    pub fn is_creator(&self) -> bool {
        self.profile()
            .map(|p| p.role == ProfileRole::Creator)
            .unwrap_or(false)
    }
}
