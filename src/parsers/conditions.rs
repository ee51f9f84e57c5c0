use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::parsers::section::{
    self, CompiledMatchers, CompiledPattern, HeadingMatcher, SectionParser,
};
use crate::types::{Condition, Confidence, Level};

const DEFAULT_REASONING: &str = "Based on symptom analysis";

static MATCHERS: CompiledMatchers = LazyLock::new(|| {
    Ok(vec![
        HeadingMatcher::new(
            r"(?i)✅\s*[*_]*\s*(?:Possible\s*)?Condition(?:\(s\)|s)?[*_]*:?[*_]*\s*",
            r"🧪|🩺|💊|🧠",
        )?,
        HeadingMatcher::new(
            r"(?i)\bCondition(?:\(s\)|s)?[*_]*:?[*_]*\s*",
            r"(?i)\b(?:Test|Treatment|Reasoning)",
        )?,
    ])
});

/// `<name> - Confidence: <level> (<percentage>%)`, percentage and parentheses optional.
static CONFIDENCE_LINE: CompiledPattern = LazyLock::new(|| {
    Regex::new(r"(?i)^(.*?)\s*-\s*Confidence:\s*(\w+)\s*\(?\s*(\d+)?\s*%?\s*\)?")
});

pub struct ConditionsSection;

impl SectionParser for ConditionsSection {
    type Item = Condition;

    fn name(&self) -> &'static str {
        "conditions"
    }

    fn matchers(&self) -> Result<&'static [HeadingMatcher], ParseError> {
        section::compiled_matchers(&MATCHERS)
    }

    fn decompose(&self, line: &str) -> Result<Option<Condition>, ParseError> {
        let pattern = section::compiled_pattern(&CONFIDENCE_LINE)?;

        let Some(caps) = pattern.captures(line) else {
            return Ok(Some(Condition {
                name: line.to_string(),
                confidence: Confidence::level(Level::Medium),
                reasoning: DEFAULT_REASONING.to_string(),
            }));
        };

        let name = caps.get(1).map_or("", |m| m.as_str()).trim();
        let label = caps.get(2).map_or("", |m| m.as_str());
        let percentage = caps.get(3).and_then(|m| parse_percentage(m.as_str()));

        Ok(Some(Condition {
            name: name.to_string(),
            confidence: Confidence {
                level: confidence_level(label),
                percentage,
            },
            reasoning: DEFAULT_REASONING.to_string(),
        }))
    }

    fn fallback(&self) -> Vec<Condition> {
        vec![Condition {
            name: "Further evaluation needed".to_string(),
            confidence: Confidence::level(Level::Low),
            reasoning: "Unable to determine specific condition from provided symptoms".to_string(),
        }]
    }

    fn error_fallback(&self) -> Vec<Condition> {
        vec![Condition {
            name: "Analysis error - please try again".to_string(),
            confidence: Confidence::level(Level::Low),
            reasoning: "Error in processing response".to_string(),
        }]
    }
}

/// Extract the possible-conditions list from a model response.
pub fn parse_conditions(text: &str) -> Vec<Condition> {
    section::resolve(&ConditionsSection, text)
}

/// Known labels map onto the enum. Anything else is passed through with
/// its case normalized ("moderate" -> "Moderate").
fn confidence_level(label: &str) -> Level {
    match Level::from_label(label) {
        Level::Unrecognized(raw) => {
            tracing::warn!(label = %raw, "unrecognized confidence level, passing through");
            Level::Unrecognized(title_case(&raw))
        }
        known => known,
    }
}

fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Percentages outside 0-100 (or too long to parse) are dropped.
fn parse_percentage(digits: &str) -> Option<u8> {
    digits.parse::<u8>().ok().filter(|p| *p <= 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decompose(line: &str) -> Condition {
        ConditionsSection.decompose(line).unwrap().unwrap()
    }

    #[test]
    fn confidence_with_percentage() {
        let c = decompose("Hypertension - Confidence: High (85%)");
        assert_eq!(c.name, "Hypertension");
        assert_eq!(c.confidence.level, Level::High);
        assert_eq!(c.confidence.percentage, Some(85));
        assert_eq!(c.reasoning, "Based on symptom analysis");
    }

    #[test]
    fn confidence_without_percentage() {
        let c = decompose("Migraine - confidence: low");
        assert_eq!(c.name, "Migraine");
        assert_eq!(c.confidence.level, Level::Low);
        assert_eq!(c.confidence.percentage, None);
    }

    #[test]
    fn bare_percentage_without_parentheses() {
        let c = decompose("Common cold - Confidence: Medium 60%");
        assert_eq!(c.confidence.level, Level::Medium);
        assert_eq!(c.confidence.percentage, Some(60));
    }

    #[test]
    fn out_of_range_percentage_is_dropped() {
        let c = decompose("Flu - Confidence: High (250%)");
        assert_eq!(c.name, "Flu");
        assert_eq!(c.confidence.level, Level::High);
        assert_eq!(c.confidence.percentage, None);
    }

    #[test]
    fn unknown_level_is_title_cased() {
        let c = decompose("Sinusitis - Confidence: MODERATE (55%)");
        assert_eq!(c.confidence.level, Level::Unrecognized("Moderate".to_string()));
        assert_eq!(c.confidence.percentage, Some(55));
    }

    #[test]
    fn plain_line_defaults_to_medium() {
        let c = decompose("Viral gastroenteritis");
        assert_eq!(c.name, "Viral gastroenteritis");
        assert_eq!(c.confidence, Confidence::level(Level::Medium));
        assert_eq!(c.reasoning, "Based on symptom analysis");
    }

    #[test]
    fn title_case_handles_empty_and_mixed() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("sEVERE"), "Severe");
    }
}
