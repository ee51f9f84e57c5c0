use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AskRequest {
    /// A health or wellness question.
    pub question: String,
}
