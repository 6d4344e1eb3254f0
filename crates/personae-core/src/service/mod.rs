//! Domain services.
//!
//! Each service is generic over the repository traits it needs and never
//! names a concrete storage type.

pub mod agent;
pub mod file;
pub mod guest;
pub mod profile;
