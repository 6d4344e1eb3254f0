//! Chat message and chat exchange types.
//!
//! Stored messages only exist for authenticated users. Guests keep their
//! history client-side and send it along with each request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::agent::AgentId;

pub use crate::llm::{Message, MessageRole};

/// A persisted chat message between a user and an agent.
///
/// Append-only. Ordered by `created_at` within an (agent, user) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub agent_id: AgentId,
    pub user_id: Option<Uuid>,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a new message row stamped with a fresh v7 id and the current time.
    pub fn new(agent_id: AgentId, user_id: Option<Uuid>, role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            agent_id,
            user_id,
            role,
            content,
            created_at: Utc::now(),
        }
    }

    /// The role/content pair sent to the LLM.
    pub fn to_message(&self) -> Message {
        Message {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Language the agent replies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    /// Human-readable language name used in the system prompt.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Es => write!(f, "es"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "es" | "spanish" => Ok(Language::Es),
            other => Err(format!("unsupported language: '{other}'")),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Es
    }
}

/// Body of a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The new user message.
    pub content: String,
    /// Prior messages, oldest first. Ignored for authenticated users, whose
    /// history is loaded from storage.
    #[serde(default)]
    pub history: Vec<Message>,
    /// Set when a guest dismissed the sign-up interstitial.
    #[serde(default)]
    pub continue_as_guest: bool,
    #[serde(default)]
    pub language: Option<Language>,
}

/// Result of a chat request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChatOutcome {
    /// The agent replied.
    Replied {
        reply: Message,
        /// Sends left for a guest; `None` for authenticated users.
        #[serde(skip_serializing_if = "Option::is_none")]
        guest_remaining: Option<u32>,
    },
    /// Guest is about to send a second message: ask "continue as guest or sign up".
    GuestPrompt { message: String },
    /// Guest reached the free message limit.
    SignUpRequired { message: String, redirect: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("spanish".parse::<Language>().unwrap(), Language::Es);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_str(r#"{"content":"Hola"}"#).unwrap();
        assert!(req.history.is_empty());
        assert!(!req.continue_as_guest);
        assert!(req.language.is_none());
    }

    #[test]
    fn test_chat_outcome_tagging() {
        let outcome = ChatOutcome::SignUpRequired {
            message: "limit".into(),
            redirect: "/".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "sign_up_required");
        assert_eq!(json["redirect"], "/");

        let replied = ChatOutcome::Replied {
            reply: Message::assistant("Hi there"),
            guest_remaining: None,
        };
        let json = serde_json::to_value(&replied).unwrap();
        assert_eq!(json["outcome"], "replied");
        assert!(json.get("guest_remaining").is_none());
    }

    #[test]
    fn test_chat_message_to_message() {
        let msg = ChatMessage::new(AgentId::new(), None, MessageRole::User, "Hello".into());
        assert_eq!(msg.to_message(), Message::user("Hello"));
    }
}
