use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Three-step label used for condition confidence and test urgency.
///
/// Labels outside the High/Medium/Low vocabulary are kept as
/// `Unrecognized` instead of being replaced, so callers can tell a
/// passthrough label from a validated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    High,
    Medium,
    Low,
    Unrecognized(String),
}

impl Level {
    /// Case-insensitive lookup of a known label. Unknown labels are kept verbatim.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unrecognized(label.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        Self::from_label(&s)
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidence {
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
}

impl Confidence {
    pub fn level(level: Level) -> Self {
        Self {
            level,
            percentage: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub confidence: Confidence,
    pub reasoning: String,
}

/// A recommended diagnostic test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticTest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Level>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Treatment {
    pub fn action(action: &str) -> Self {
        Self {
            action: action.to_string(),
            explanation: None,
        }
    }
}

/// Structured form of one symptom-analysis response.
///
/// Every list holds at least one entry except `warning_signs`, which is
/// empty when the response carried no warning section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub conditions: Vec<Condition>,
    pub tests: Vec<DiagnosticTest>,
    pub treatments: Vec<Treatment>,
    pub warning_signs: Vec<String>,
    pub reasoning_tree: Vec<String>,
}

/// Who requested an analysis. Recorded with each saved session.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Patient,
    Doctor,
}
