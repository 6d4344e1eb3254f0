//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (personae-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod agent;
pub mod file;
pub mod guest;
pub mod message;
pub mod profile;
