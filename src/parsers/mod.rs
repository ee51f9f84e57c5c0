pub mod conditions;
pub mod gemini;
pub mod reasoning;
pub mod section;
pub mod treatments;

pub use conditions::parse_conditions;
pub use reasoning::parse_reasoning;
pub use recommended_tests::parse_tests;
pub use treatments::parse_treatments_and_warnings;

use crate::error::AetherError;
use crate::types::DiagnosisResult;

/// Trait for turning a provider's raw response body into response text.
pub trait OutputParser: Send + Sync {
    /// Parse raw body bytes into a text response string.
    fn parse(&self, body: &[u8]) -> Result<String, AetherError>;
}

/// Parse every section of a symptom-analysis response.
///
/// Never fails: each section falls back to its own default independently.
pub fn parse_diagnosis(text: &str) -> DiagnosisResult {
    let conditions = parse_conditions(text);
    let tests = parse_tests(text);
    let (treatments, warning_signs) = parse_treatments_and_warnings(text);
    let reasoning_tree = parse_reasoning(text);

    DiagnosisResult {
        conditions,
        tests,
        treatments,
        warning_signs,
        reasoning_tree,
    }
}
