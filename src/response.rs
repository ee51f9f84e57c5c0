use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// JSON envelope returned by every tool.
/// All tools return Content::text(json_string) carrying this shape.
#[derive(Debug, Serialize)]
pub struct ToolResponse {
    pub status: &'static str,
    pub content: String,
    /// "text", "markdown" or "json", describing `content`.
    pub content_type: &'static str,
    pub metadata: ToolMetadata,
}

#[derive(Debug, Serialize)]
pub struct ToolMetadata {
    pub tool_name: String,
    pub model_used: String,
    pub provider_used: String,
    #[serde(serialize_with = "serialize_finite_f64")]
    pub duration_seconds: f64,
    /// Id of the saved session, when the tool persisted one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ToolMetadata {
    /// Metadata for tools that never reach a model.
    pub fn local(tool_name: &str, duration_seconds: f64) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            model_used: "none".to_string(),
            provider_used: "none".to_string(),
            duration_seconds,
            session_id: None,
        }
    }
}

/// Serialize f64, clamping non-finite values (NaN, Inf) to 0.0.
fn serialize_finite_f64<S: serde::Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(if v.is_finite() { *v } else { 0.0 })
}

impl ToolResponse {
    pub fn success(content: String, content_type: &'static str, metadata: ToolMetadata) -> Self {
        Self {
            status: "success",
            content,
            content_type,
            metadata,
        }
    }

    pub fn error(message: String, metadata: ToolMetadata) -> Self {
        Self {
            status: "error",
            content: message,
            content_type: "text",
            metadata,
        }
    }

    /// Convert to MCP CallToolResult.
    /// Always returns success at the MCP transport level; failures are
    /// reported in the JSON payload (`"status": "error"`).
    pub fn into_call_tool_result(self) -> CallToolResult {
        match serde_json::to_string(&self) {
            Ok(json) => CallToolResult::success(vec![Content::text(json)]),
            Err(e) => {
                let escaped = e.to_string().replace('\\', "\\\\").replace('"', "\\\"");
                CallToolResult::success(vec![Content::text(format!(
                    r#"{{"status":"error","content":"serialization failed: {escaped}","content_type":"text","metadata":{{}}}}"#
                ))])
            }
        }
    }
}
