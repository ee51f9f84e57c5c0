use serde::Deserialize;

use crate::error::AetherError;
use crate::parsers::OutputParser;

/// Parses a Gemini `generateContent` response body.
/// Expected shape: `{"candidates": [{"content": {"parts": [{"text": "..."}]}}], ...}`
pub struct GeminiResponseParser;

pub const PROVIDER: &str = "gemini";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl OutputParser for GeminiResponseParser {
    fn parse(&self, body: &[u8]) -> Result<String, AetherError> {
        let response: GenerateContentResponse = serde_json::from_slice(body)
            .map_err(|e| AetherError::SchemaParse(format!("gemini JSON parse failed: {e}")))?;

        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(AetherError::Blocked {
                provider: PROVIDER.to_string(),
                reason,
            });
        }

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AetherError::SchemaParse("no valid response from the model".to_string())
            })
    }
}

/// Pull `error.message` out of an error body, if it has one.
pub fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
}
