//! Section location and line extraction shared by the response parsers.
//!
//! A model response is asked to follow a fixed layout of emoji-headed
//! sections, but nothing guarantees it does. Each section is therefore found
//! by trying an ordered list of [`HeadingMatcher`]s, most specific first,
//! and the first heading that matches decides the section text. Lines inside
//! the section are admitted, stripped of their bullet glyph, and handed to a
//! per-section decomposer.

use std::sync::LazyLock;

use regex::Regex;

use crate::dispatch::http::MAX_RESPONSE_BYTES;
use crate::error::ParseError;

/// Glyphs that mark a list item.
pub const BULLET_GLYPHS: [char; 3] = ['•', '-', '*'];

/// Heading patterns compiled on first use. Compilation failures surface as
/// [`ParseError::Pattern`] on every call instead of panicking.
pub type CompiledMatchers = LazyLock<Result<Vec<HeadingMatcher>, regex::Error>>;

/// A single line pattern compiled on first use.
pub type CompiledPattern = LazyLock<Result<Regex, regex::Error>>;

pub fn compiled_matchers(
    matchers: &'static CompiledMatchers,
) -> Result<&'static [HeadingMatcher], ParseError> {
    match &**matchers {
        Ok(list) => Ok(list),
        Err(e) => Err(e.into()),
    }
}

pub fn compiled_pattern(pattern: &'static CompiledPattern) -> Result<&'static Regex, ParseError> {
    match &**pattern {
        Ok(re) => Ok(re),
        Err(e) => Err(e.into()),
    }
}

/// One way of recognizing a section: a heading and the marker that ends it.
///
/// The section runs from the end of the heading match (trailing whitespace
/// included) to the earliest terminator match after it, or to end of text.
#[derive(Debug)]
pub struct HeadingMatcher {
    heading: Regex,
    terminator: Regex,
}

impl HeadingMatcher {
    pub fn new(heading: &str, terminator: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            heading: Regex::new(heading)?,
            terminator: Regex::new(terminator)?,
        })
    }

    /// Returns the trimmed section body if the heading occurs in `text`.
    /// An empty body still counts as a match.
    pub fn attempt_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        let heading = self.heading.find(text)?;
        let rest = &text[heading.end()..];
        let end = self.terminator.find(rest).map_or(rest.len(), |m| m.start());
        Some(rest[..end].trim())
    }
}

/// Try each matcher in order; the first heading found wins and later
/// matchers are never consulted.
pub fn locate_section<'t>(matchers: &[HeadingMatcher], text: &'t str) -> Option<&'t str> {
    matchers.iter().find_map(|m| m.attempt_match(text))
}

/// Rule deciding which lines of a section are list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAdmission {
    /// Only lines starting with a bullet glyph.
    Bulleted,
    /// Bulleted lines, plus unbulleted prose longer than `min_chars` characters.
    BulletedOrProse { min_chars: usize },
}

impl LineAdmission {
    pub fn admits(&self, trimmed: &str) -> bool {
        let bulleted = trimmed.starts_with(BULLET_GLYPHS);
        match self {
            Self::Bulleted => bulleted,
            Self::BulletedOrProse { min_chars } => {
                bulleted || trimmed.chars().count() > *min_chars
            }
        }
    }
}

/// Remove one leading bullet glyph and the whitespace around the rest.
pub fn strip_bullet(trimmed: &str) -> &str {
    trimmed
        .strip_prefix(BULLET_GLYPHS)
        .unwrap_or(trimmed)
        .trim()
}

/// One section of a diagnostic response, as data.
///
/// Implementations are independent: a missing or malformed section never
/// affects the others, and each carries its own fallback values.
pub trait SectionParser {
    type Item;

    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Heading matchers in priority order.
    fn matchers(&self) -> Result<&'static [HeadingMatcher], ParseError>;

    fn admission(&self) -> LineAdmission {
        LineAdmission::Bulleted
    }

    /// Turn one bullet-stripped, non-empty line into an item.
    /// `Ok(None)` drops the line.
    fn decompose(&self, line: &str) -> Result<Option<Self::Item>, ParseError>;

    /// Returned when the section yields no items.
    fn fallback(&self) -> Vec<Self::Item>;

    /// Returned when extraction fails internally.
    fn error_fallback(&self) -> Vec<Self::Item>;
}

/// Extract the raw item list for one section. Empty when the section is
/// missing or holds no admissible lines.
pub fn extract<P: SectionParser>(parser: &P, text: &str) -> Result<Vec<P::Item>, ParseError> {
    if text.len() > MAX_RESPONSE_BYTES {
        return Err(ParseError::InputTooLarge {
            len: text.len(),
            max: MAX_RESPONSE_BYTES,
        });
    }

    let matchers = parser.matchers()?;
    let Some(section) = locate_section(matchers, text) else {
        tracing::debug!(section = parser.name(), "section heading not found");
        return Ok(Vec::new());
    };

    let admission = parser.admission();
    let mut items = Vec::new();
    for line in section.lines() {
        let trimmed = line.trim();
        if !admission.admits(trimmed) {
            continue;
        }
        let cleaned = strip_bullet(trimmed);
        if cleaned.is_empty() {
            continue;
        }
        if let Some(item) = parser.decompose(cleaned)? {
            items.push(item);
        }
    }
    Ok(items)
}

/// Extract one section and apply its fallback policy. Never fails.
pub fn resolve<P: SectionParser>(parser: &P, text: &str) -> Vec<P::Item> {
    match extract(parser, text) {
        Ok(items) if items.is_empty() => {
            tracing::debug!(section = parser.name(), "no items found, using fallback");
            parser.fallback()
        }
        Ok(items) => {
            tracing::debug!(section = parser.name(), count = items.len(), "parsed section");
            items
        }
        Err(e) => {
            tracing::warn!(section = parser.name(), "section parse failed: {e}");
            parser.error_fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(heading: &str, terminator: &str) -> HeadingMatcher {
        HeadingMatcher::new(heading, terminator).unwrap()
    }

    #[test]
    fn section_ends_at_earliest_terminator() {
        let m = matcher(r"(?i)Alpha:\s*", r"Beta|Gamma");
        let text = "Alpha:\n• one\n• two\nGamma\n• three\nBeta";
        assert_eq!(m.attempt_match(text), Some("• one\n• two"));
    }

    #[test]
    fn section_runs_to_end_without_terminator() {
        let m = matcher(r"Alpha:\s*", r"\n\s*\n");
        assert_eq!(m.attempt_match("Alpha: • one\n• two\n"), Some("• one\n• two"));
    }

    #[test]
    fn empty_section_still_counts_as_match() {
        let first = matcher(r"Alpha:\s*", r"Beta");
        let second = matcher(r"Alp", r"$^");
        let matchers = [first, second];
        assert_eq!(locate_section(&matchers, "Alpha: Beta"), Some(""));
    }

    #[test]
    fn first_matching_heading_wins() {
        let specific = matcher(r"🧪\s*Tests:\s*", r"💊");
        let general = matcher(r"Tests:\s*", r"Treatment");
        let text = "Tests: • generic\n🧪 Tests: • specific\n💊 Treatment";
        let matchers = [specific, general];
        assert_eq!(locate_section(&matchers, text), Some("• specific"));
    }

    #[test]
    fn bulleted_admission() {
        let rule = LineAdmission::Bulleted;
        assert!(rule.admits("• item"));
        assert!(rule.admits("- item"));
        assert!(rule.admits("* item"));
        assert!(!rule.admits("plain prose that is long enough"));
    }

    #[test]
    fn prose_admission_counts_characters() {
        let rule = LineAdmission::BulletedOrProse { min_chars: 10 };
        assert!(rule.admits("• ok"));
        assert!(rule.admits("elevenchars"));
        assert!(!rule.admits("tenchars!!"));
        // Multi-byte characters count once.
        assert!(!rule.admits("ééééééééé"));
    }

    #[test]
    fn strip_bullet_removes_one_glyph() {
        assert_eq!(strip_bullet("•   Rest"), "Rest");
        assert_eq!(strip_bullet("- - nested"), "- nested");
        assert_eq!(strip_bullet("**Bold** item"), "*Bold** item");
        assert_eq!(strip_bullet("plain"), "plain");
    }
}
