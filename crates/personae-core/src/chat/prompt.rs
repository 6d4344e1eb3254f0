//! System prompt builder for agent personas.
//!
//! Layout:
//! ```text
//! You are {name}, an AI assistant with the following characteristics:
//!
//! Description: {description}
//!
//! Personality traits: {trait}, {trait}
//!
//! Special instructions: {instructions}
//!
//! Reference material:
//! {knowledge}
//!
//! Maintain these characteristics throughout the conversation and respond in {language}.
//! ```
//!
//! Trait, instruction and knowledge sections are omitted when empty.

use personae_types::agent::Agent;
use personae_types::chat::Language;

/// Separator placed between extracts from different files.
const KNOWLEDGE_SEPARATOR: &str = "\n\n---\n\n";

pub struct PersonaPromptBuilder;

impl PersonaPromptBuilder {
    /// Build the system instruction for a conversation with `agent`.
    pub fn build(agent: &Agent, knowledge: Option<&str>, language: Language) -> String {
        let mut sections = Vec::with_capacity(5);

        sections.push(format!(
            "You are {}, an AI assistant with the following characteristics:",
            agent.name
        ));
        sections.push(format!("Description: {}", agent.description));

        if !agent.traits.is_empty() {
            sections.push(format!("Personality traits: {}", agent.traits.join(", ")));
        }

        if let Some(instructions) = agent.instructions.as_deref().filter(|i| !i.trim().is_empty()) {
            sections.push(format!("Special instructions: {}", instructions.trim()));
        }

        if let Some(knowledge) = knowledge.filter(|k| !k.trim().is_empty()) {
            sections.push(format!("Reference material:\n{knowledge}"));
        }

        sections.push(format!(
            "Maintain these characteristics throughout the conversation and respond in {}.",
            language.display_name()
        ));

        sections.join("\n\n")
    }

    /// Join extracted file texts and cap the result at `max_chars` characters.
    ///
    /// Returns `None` when there is nothing to include.
    pub fn knowledge(contents: &[String], max_chars: usize) -> Option<String> {
        let joined = contents
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(KNOWLEDGE_SEPARATOR);
        if joined.is_empty() || max_chars == 0 {
            return None;
        }
        match joined.char_indices().nth(max_chars) {
            Some((cut, _)) => Some(joined[..cut].to_string()),
            None => Some(joined),
        }
    }
}
