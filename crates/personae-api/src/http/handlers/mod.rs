//! HTTP request handlers for the REST API.

pub mod agent;
pub mod chat;
pub mod file;
pub mod message;
pub mod profile;
