use std::sync::LazyLock;

use crate::error::ParseError;
use crate::parsers::section::{self, CompiledMatchers, HeadingMatcher, LineAdmission, SectionParser};

/// Unbulleted prose is admitted only above this many characters.
const PROSE_MIN_CHARS: usize = 10;

/// Stripped lines at or below this many characters are dropped.
const LINE_MIN_CHARS: usize = 5;

static MATCHERS: CompiledMatchers = LazyLock::new(|| {
    Ok(vec![
        HeadingMatcher::new(
            r"(?i)🧠\s*[*_]*\s*(?:Medical\s*)?Reasoning[*_]*:?[*_]*\s*",
            r"\n\s*\n",
        )?,
        HeadingMatcher::new(r"(?i)\bReasoning[*_]*:?[*_]*\s*", r"\n\s*\n")?,
    ])
});

pub struct ReasoningSection;

impl SectionParser for ReasoningSection {
    type Item = String;

    fn name(&self) -> &'static str {
        "reasoning"
    }

    fn matchers(&self) -> Result<&'static [HeadingMatcher], ParseError> {
        section::compiled_matchers(&MATCHERS)
    }

    fn admission(&self) -> LineAdmission {
        LineAdmission::BulletedOrProse {
            min_chars: PROSE_MIN_CHARS,
        }
    }

    fn decompose(&self, line: &str) -> Result<Option<String>, ParseError> {
        if line.chars().count() <= LINE_MIN_CHARS {
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }

    fn fallback(&self) -> Vec<String> {
        vec!["Medical reasoning based on symptom presentation and clinical knowledge".to_string()]
    }

    fn error_fallback(&self) -> Vec<String> {
        vec!["Analysis based on reported symptoms".to_string()]
    }
}

/// Extract the reasoning chain from a model response.
pub fn parse_reasoning(text: &str) -> Vec<String> {
    section::resolve(&ReasoningSection, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_are_dropped() {
        assert_eq!(ReasoningSection.decompose("Fever").unwrap(), None);
        assert_eq!(
            ReasoningSection.decompose("Fever → infection").unwrap().as_deref(),
            Some("Fever → infection")
        );
    }
}
