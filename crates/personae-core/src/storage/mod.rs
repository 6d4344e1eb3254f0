//! Storage abstractions for Personae.
//!
//! Implementations live in personae-infra.

pub mod object_store;
