//! Guest visitor identity and message-count gating types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::agent::AgentId;

/// Free messages a guest may send to a single agent.
pub const DEFAULT_GUEST_MESSAGE_LIMIT: u32 = 5;

/// Client-generated identifier of an anonymous visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(pub Uuid);

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GuestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Counter row for one (guest, agent) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestInteraction {
    pub id: Uuid,
    pub guest_id: GuestId,
    pub agent_id: AgentId,
    pub interaction_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Verdict of the guest gate for one outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// The message may be sent; `count` is the counter after this send.
    Allowed { count: u32, remaining: u32 },
    /// Show the "continue as guest or sign up" interstitial; nothing counted.
    Prompt,
    /// The free limit is used up.
    SignUpRequired,
}

/// Read-only snapshot of a guest's usage of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestStatus {
    pub interaction_count: u32,
    pub limit: u32,
    pub remaining: u32,
    pub sign_up_required: bool,
}

impl GuestStatus {
    pub fn new(interaction_count: u32, limit: u32) -> Self {
        Self {
            interaction_count,
            limit,
            remaining: limit.saturating_sub(interaction_count),
            sign_up_required: interaction_count >= limit,
        }
    }
}
