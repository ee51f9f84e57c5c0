use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::Semaphore;

use crate::dispatch::{ProviderRequest, ProviderResult};
use crate::error::AetherError;
use crate::parsers::OutputParser;
use crate::parsers::gemini::{self, GeminiResponseParser, PROVIDER};

/// Largest completion body accepted, and the largest text the response
/// parsers will scan.
pub const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024; // 2MB

/// Max concurrent requests to the completion API per process.
const HTTP_MAX_CONCURRENT: usize = 8;

/// Client for the Gemini `generateContent` endpoint. No retries: a failed
/// call is reported to the caller as-is.
pub struct GeminiDispatch {
    client: Client,
    semaphore: Semaphore,
}

impl GeminiDispatch {
    pub fn new() -> Result<Self, AetherError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self {
            client,
            semaphore: Semaphore::new(HTTP_MAX_CONCURRENT),
        })
    }

    /// Returns the number of free request permits (for testing).
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub async fn query_model(
        &self,
        req: &ProviderRequest,
        base_url: &str,
        api_key: &str,
    ) -> Result<ProviderResult, AetherError> {
        let start = Instant::now();

        // Check for expired deadline before making the request
        let timeout = remaining(req.deadline)?;
        let _permit = tokio::time::timeout(timeout, self.semaphore.acquire())
            .await
            .map_err(|_| AetherError::Timeout(0))?
            .map_err(|_| AetherError::Other("semaphore closed".to_string()))?;
        let timeout = remaining(req.deadline)?;

        let url = format!("{}/{}:generateContent", base_url.trim_end_matches('/'), req.model);
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": req.prompt}]}]
        });

        tracing::debug!(model = %req.model, prompt_len = req.prompt.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AetherError::Timeout(start.elapsed().as_millis() as u64)
                } else {
                    AetherError::Request(e)
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AetherError::RateLimited {
                provider: PROVIDER.to_string(),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AetherError::AuthFailed {
                provider: PROVIDER.to_string(),
                message: format!("{status}"),
            });
        }

        // Cap error body reads to MAX_RESPONSE_BYTES to prevent memory exhaustion
        if !status.is_success() {
            let error_bytes = response.bytes().await.unwrap_or_default();
            let truncated = &error_bytes[..error_bytes.len().min(MAX_RESPONSE_BYTES)];
            let message = gemini::error_message(truncated)
                .unwrap_or_else(|| format!("API error: {status}"));
            return Err(AetherError::Upstream {
                provider: PROVIDER.to_string(),
                message,
                status: Some(status.as_u16()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| AetherError::Upstream {
            provider: PROVIDER.to_string(),
            message: format!("failed to read response body: {e}"),
            status: None,
        })?;

        if bytes.len() > MAX_RESPONSE_BYTES {
            return Err(AetherError::Upstream {
                provider: PROVIDER.to_string(),
                message: format!(
                    "response too large: {} bytes (max {})",
                    bytes.len(),
                    MAX_RESPONSE_BYTES
                ),
                status: None,
            });
        }

        let text = GeminiResponseParser.parse(&bytes)?;
        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(model = %req.model, latency_ms, text_len = text.len(), "completion received");

        Ok(ProviderResult {
            text,
            model: req.model.clone(),
            provider: PROVIDER.to_string(),
            latency_ms,
        })
    }
}

/// Time left before `deadline`, or `Timeout` if under 100ms remain.
fn remaining(deadline: Instant) -> Result<Duration, AetherError> {
    deadline
        .checked_duration_since(Instant::now())
        .filter(|d| *d > Duration::from_millis(100))
        .ok_or(AetherError::Timeout(0))
}
