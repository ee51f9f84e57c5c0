pub mod http;

use std::time::Instant;

/// Internal request type for one completion call.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub prompt: String,
    pub model: String,
    pub deadline: Instant,
}

/// Internal result type for one completion call.
#[derive(Debug)]
pub struct ProviderResult {
    pub text: String,
    pub model: String,
    pub provider: String,
    pub latency_ms: u64,
}
