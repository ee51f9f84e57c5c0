use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for tools returning a diagnosis.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Structured DiagnosisResult JSON.
    #[default]
    Json,
    /// Human-readable Markdown report.
    #[serde(alias = "report", alias = "md")]
    Markdown,
}
