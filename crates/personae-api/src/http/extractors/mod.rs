pub mod query;
pub mod session;
