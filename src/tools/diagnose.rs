use schemars::JsonSchema;
use serde::Deserialize;

use crate::prompts::PromptKind;
use crate::tools::enums::ResponseFormat;
use crate::types::UserRole;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DiagnoseRequest {
    /// Free-text description of the symptoms (at least 10 characters).
    pub symptoms: String,
    /// Account id to save the session under. Sessions are only saved when set.
    /// Letters, digits, '_' and '-' only.
    pub user_id: Option<String>,
    /// "patient" (default) or "doctor".
    pub user_role: Option<UserRole>,
    /// Template to use: "symptoms" (default, every section), "tests", "treatments"
    /// or "reasoning". Sections outside the focus come back as fallbacks.
    pub focus: Option<PromptKind>,
    /// "json" (default, structured result) or "markdown" (printable report).
    pub response_format: Option<ResponseFormat>,
}
