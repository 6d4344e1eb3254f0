//! Infrastructure layer for Personae.
//!
//! Contains implementations of the ports defined in `personae-core`:
//! SQLite repositories, the OpenAI-compatible LLM client, the local object
//! store, and the `config.toml` loader.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
