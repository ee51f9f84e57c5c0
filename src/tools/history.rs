use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::AetherError;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HistoryRequest {
    /// Account id whose saved sessions to list.
    pub user_id: String,
    /// Maximum sessions to return, newest first (default 10). Must be at
    /// least 1; values above 100 are capped at 100.
    pub limit: Option<usize>,
}

impl HistoryRequest {
    pub fn limit(&self) -> Result<usize, AetherError> {
        match self.limit {
            None => Ok(DEFAULT_HISTORY_LIMIT),
            Some(0) => Err(AetherError::InvalidInput(
                "limit must be at least 1".to_string(),
            )),
            Some(n) => Ok(n.min(MAX_HISTORY_LIMIT)),
        }
    }
}
