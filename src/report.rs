use crate::types::DiagnosisResult;

pub const NOTICE: &str = "**Important Notice:** This AI-powered analysis is not a substitute for \
professional medical advice. Always consult with a healthcare professional for proper diagnosis \
and treatment.";

/// Render a diagnosis as a human-readable Markdown report.
pub fn render_report(result: &DiagnosisResult) -> String {
    let mut out = String::from("# 🩺 Diagnosis Report\n\n");

    out.push_str("## ✅ Possible Conditions\n\n");
    for condition in &result.conditions {
        out.push_str(&format!("- **{}** ({}", condition.name, condition.confidence.level));
        if let Some(pct) = condition.confidence.percentage {
            out.push_str(&format!(", {pct}%"));
        }
        out.push_str(&format!(")\n  _{}_\n", condition.reasoning));
    }

    out.push_str("\n## 🧪 Recommended Tests\n\n");
    for test in &result.tests {
        out.push_str(&format!("- **{}**\n", test.name));
        if let Some(purpose) = &test.purpose {
            out.push_str(&format!("  Purpose: {purpose}\n"));
        }
        if let Some(urgency) = &test.urgency {
            out.push_str(&format!("  Urgency: {urgency}\n"));
        }
    }

    out.push_str("\n## 💊 Treatment Recommendations\n\n");
    for treatment in &result.treatments {
        out.push_str(&format!("- **{}**\n", treatment.action));
        if let Some(explanation) = &treatment.explanation {
            out.push_str(&format!("  _{explanation}_\n"));
        }
    }

    if !result.warning_signs.is_empty() {
        out.push_str("\n## 🚨 When to See a Doctor\n\n");
        for warning in &result.warning_signs {
            out.push_str(&format!("- {warning}\n"));
        }
    }

    out.push_str("\n## 🧠 Medical Reasoning\n\n");
    for reason in &result.reasoning_tree {
        out.push_str(&format!("- {reason}\n"));
    }

    out.push_str(&format!("\n---\n\n{NOTICE}\n"));
    out
}
