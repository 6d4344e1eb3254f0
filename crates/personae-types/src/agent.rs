use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for an agent, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub Uuid);

impl AgentId {
    /// Create a new AgentId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create an AgentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A configurable persona that users chat with.
///
/// Anyone may read an agent; only its creator may change or delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// Short description shown on cards and used in the system prompt.
    pub description: String,
    /// Freeform area of expertise (may be empty).
    pub expertise: String,
    /// Special instructions appended to the system prompt.
    pub instructions: Option<String>,
    /// Ordered personality traits ("Friendly", "Patient", ...).
    pub traits: Vec<String>,
    /// Profile that created the agent.
    pub creator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Whether `profile_id` created this agent.
    pub fn is_created_by(&self, profile_id: &Uuid) -> bool {
        self.creator_id.as_ref() == Some(profile_id)
    }
}

/// An agent as shown in listings, with the number of user messages it received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentListing {
    #[serde(flatten)]
    pub agent: Agent,
    pub interaction_count: u64,
}

/// Request to create a new agent. `name` and `description` are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub expertise: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub traits: Option<Vec<String>>,
}

/// Partial update of an agent. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub expertise: Option<String>,
    /// An empty string clears the instructions.
    pub instructions: Option<String>,
    pub traits: Option<Vec<String>>,
}

/// Normalize a trait list: trim entries, drop empties, drop duplicates.
///
/// Order of first occurrence is preserved.
///
/// ```
/// use personae_types::agent::normalize_traits;
///
/// let traits = vec![" Patient ".to_string(), "".to_string(), "Patient".to_string(), "Playful".to_string()];
/// assert_eq!(normalize_traits(traits), vec!["Patient", "Playful"]);
/// ```
pub fn normalize_traits(traits: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(traits.len());
    for t in traits {
        let t = t.trim();
        if t.is_empty() || out.iter().any(|existing| existing == t) {
            continue;
        }
        out.push(t.to_string());
    }
    out
}

/// Collapse blank instructions to `None`.
pub fn normalize_instructions(instructions: Option<String>) -> Option<String> {
    instructions
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_display_parse() {
        let id = AgentId::new();
        let parsed: AgentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_agent_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<AgentId>().is_err());
    }

    #[test]
    fn test_normalize_traits_keeps_order() {
        let traits = vec!["Empathetic".into(), "Structured".into(), "Empathetic".into()];
        assert_eq!(normalize_traits(traits), vec!["Empathetic", "Structured"]);
    }

    #[test]
    fn test_normalize_instructions_blank() {
        assert_eq!(normalize_instructions(Some("   ".into())), None);
        assert_eq!(normalize_instructions(None), None);
        assert_eq!(
            normalize_instructions(Some(" Be brief ".into())),
            Some("Be brief".to_string())
        );
    }

    #[test]
    fn test_listing_flattens_agent() {
        let now = Utc::now();
        let listing = AgentListing {
            agent: Agent {
                id: AgentId::new(),
                name: "Tutor".into(),
                description: "Helps with homework".into(),
                expertise: String::new(),
                instructions: None,
                traits: vec!["Patient".into()],
                creator_id: None,
                created_at: now,
                updated_at: now,
            },
            interaction_count: 3,
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["name"], "Tutor");
        assert_eq!(json["interaction_count"], 3);
    }

    #[test]
    fn test_is_created_by() {
        let creator = Uuid::now_v7();
        let now = Utc::now();
        let agent = Agent {
            id: AgentId::new(),
            name: "A".into(),
            description: "B".into(),
            expertise: String::new(),
            instructions: None,
            traits: Vec::new(),
            creator_id: Some(creator),
            created_at: now,
            updated_at: now,
        };
        assert!(agent.is_created_by(&creator));
        assert!(!agent.is_created_by(&Uuid::now_v7()));
    }
}
