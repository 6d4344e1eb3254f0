//! Shared domain types for Personae.
//!
//! This crate contains the domain types used across the Personae service:
//! agents, chat messages, guest counters, profiles, knowledge files, LLM
//! request shapes, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod file;
pub mod guest;
pub mod llm;
pub mod profile;
pub mod session;
