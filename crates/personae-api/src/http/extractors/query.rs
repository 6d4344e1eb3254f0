//! Query parameter extractors for list endpoints.

use serde::Deserialize;

/// Query parameters for the agent list endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct AgentListQuery {
    /// Maximum results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
    /// Only agents created by the caller.
    #[serde(default)]
    pub mine: bool,
}
