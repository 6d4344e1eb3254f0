//! Chat orchestration: persona prompt assembly and the send pipeline.

pub mod prompt;
pub mod service;
