use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::parsers::section::{
    self, CompiledMatchers, CompiledPattern, HeadingMatcher, SectionParser,
};
use crate::types::Treatment;

static TREATMENT_MATCHERS: CompiledMatchers = LazyLock::new(|| {
    Ok(vec![
        HeadingMatcher::new(
            r"(?i)💊\s*[*_]*\s*Treatments?\s*(?:Recommendations?)?[*_]*:?[*_]*\s*",
            r"(?i)🚨|🧠|When\s*to\s*See",
        )?,
        HeadingMatcher::new(
            r"(?i)\bTreatments?(?:\s*Recommendations?)?[*_]*:?[*_]*\s*",
            r"(?i)\b(?:Warning|Reasoning|When\s*to\s*See)",
        )?,
    ])
});

const BLANK_LINE: &str = r"\n\s*\n";

static WARNING_MATCHERS: CompiledMatchers = LazyLock::new(|| {
    Ok(vec![
        HeadingMatcher::new(
            r"(?i)🚨\s*[*_]*\s*When\s*to\s*See\s*(?:a\s*)?Doctor[*_]*:?[*_]*\s*",
            BLANK_LINE,
        )?,
        HeadingMatcher::new(
            r"(?i)\bWhen\s*to\s*See\s*(?:a\s*)?Doctor[*_]*:?[*_]*\s*",
            BLANK_LINE,
        )?,
        HeadingMatcher::new(r"(?i)\bWarning\s*Signs?[*_]*:?[*_]*\s*", BLANK_LINE)?,
    ])
});

/// `<action> - <explanation>`, split at the first spaced hyphen.
static EXPLAINED_LINE: CompiledPattern = LazyLock::new(|| Regex::new(r"^(.*?)\s+-\s+(.+)$"));

pub struct TreatmentSection;

impl SectionParser for TreatmentSection {
    type Item = Treatment;

    fn name(&self) -> &'static str {
        "treatments"
    }

    fn matchers(&self) -> Result<&'static [HeadingMatcher], ParseError> {
        section::compiled_matchers(&TREATMENT_MATCHERS)
    }

    fn decompose(&self, line: &str) -> Result<Option<Treatment>, ParseError> {
        let pattern = section::compiled_pattern(&EXPLAINED_LINE)?;

        let split = pattern.captures(line).and_then(|caps| {
            let action = caps.get(1)?.as_str().trim();
            let explanation = caps.get(2)?.as_str().trim();
            (!action.is_empty() && !explanation.is_empty()).then_some((action, explanation))
        });

        Ok(Some(match split {
            Some((action, explanation)) => Treatment {
                action: action.to_string(),
                explanation: Some(explanation.to_string()),
            },
            None => Treatment::action(line),
        }))
    }

    fn fallback(&self) -> Vec<Treatment> {
        vec![Treatment::action(
            "Consult healthcare provider for appropriate treatment",
        )]
    }

    fn error_fallback(&self) -> Vec<Treatment> {
        vec![Treatment::action("Consult healthcare provider")]
    }
}

pub struct WarningSection;

impl SectionParser for WarningSection {
    type Item = String;

    fn name(&self) -> &'static str {
        "warnings"
    }

    fn matchers(&self) -> Result<&'static [HeadingMatcher], ParseError> {
        section::compiled_matchers(&WARNING_MATCHERS)
    }

    fn decompose(&self, line: &str) -> Result<Option<String>, ParseError> {
        Ok(Some(line.to_string()))
    }

    /// Warnings are optional; an absent section stays empty.
    fn fallback(&self) -> Vec<String> {
        Vec::new()
    }

    fn error_fallback(&self) -> Vec<String> {
        vec!["Seek immediate medical attention if symptoms worsen".to_string()]
    }
}

/// Extract treatment recommendations and warning signs from a model response.
///
/// The two sections are scanned independently, but an internal failure in
/// either replaces both with their error fallbacks.
pub fn parse_treatments_and_warnings(text: &str) -> (Vec<Treatment>, Vec<String>) {
    let treatments = section::extract(&TreatmentSection, text);
    let warnings = section::extract(&WarningSection, text);

    match (treatments, warnings) {
        (Ok(treatments), Ok(warnings)) => {
            let treatments = if treatments.is_empty() {
                tracing::debug!("no treatments found, using fallback");
                TreatmentSection.fallback()
            } else {
                treatments
            };
            tracing::debug!(
                treatments = treatments.len(),
                warnings = warnings.len(),
                "parsed treatments"
            );
            (treatments, warnings)
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("treatment parse failed: {e}");
            (
                TreatmentSection.error_fallback(),
                WarningSection.error_fallback(),
            )
        }
    }
}
