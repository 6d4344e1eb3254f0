//! Business logic and repository trait definitions for Personae.
//!
//! This crate defines the "ports" (repository traits, object storage, LLM
//! provider) that the infrastructure layer implements. It depends only on
//! `personae-types` -- never on `personae-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
