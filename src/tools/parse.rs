use schemars::JsonSchema;
use serde::Deserialize;

use crate::tools::enums::ResponseFormat;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ParseRequest {
    /// Raw model output using the ✅ 🧪 💊 🚨 🧠 section layout. At most 2 MiB;
    /// longer text yields the error fallback for every section.
    pub text: String,
    /// "json" (default, structured result) or "markdown" (printable report).
    pub response_format: Option<ResponseFormat>,
}
