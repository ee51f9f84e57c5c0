//! Response parser behavior over complete model responses.

use aether::dispatch::http::MAX_RESPONSE_BYTES;
use aether::parsers::{
    parse_conditions, parse_diagnosis, parse_reasoning, parse_tests,
    parse_treatments_and_warnings,
};
use aether::prompts::PromptKind;
use aether::types::{Level, Treatment};

const FULL_RESPONSE: &str = "\
Here is my assessment.

✅ **Possible Conditions:**
• Hypertension - Confidence: High (85%)
• Tension headache - Confidence: Medium (60%)

🧪 **Recommended Tests:**
• CBC - Purpose: rule out infection - Urgency: Low
• Blood pressure monitoring

💊 **Treatment Recommendations:**
• Rest - lie down in a quiet, dark room
• Hydration

🚨 When to See a Doctor:
• Sudden severe headache
• Vision changes

🧠 **Medical Reasoning:**
• Persistent headache with raised pressure points to hypertension
• Band-like pain fits a tension pattern
";

// ---------------------------------------------------------------------------
// Empty and unstructured input
// ---------------------------------------------------------------------------

#[test]
fn empty_input_yields_every_fallback() {
    let conditions = parse_conditions("");
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].name, "Further evaluation needed");
    assert_eq!(conditions[0].confidence.level, Level::Low);
    assert_eq!(conditions[0].confidence.percentage, None);
    assert_eq!(
        conditions[0].reasoning,
        "Unable to determine specific condition from provided symptoms"
    );

    let tests = parse_tests("");
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].name, "Consult healthcare provider for appropriate testing");
    assert_eq!(tests[0].purpose, None);
    assert_eq!(tests[0].urgency, Some(Level::Medium));

    let (treatments, warnings) = parse_treatments_and_warnings("");
    assert_eq!(
        treatments,
        vec![Treatment::action("Consult healthcare provider for appropriate treatment")]
    );
    assert!(warnings.is_empty());

    assert_eq!(
        parse_reasoning(""),
        vec!["Medical reasoning based on symptom presentation and clinical knowledge".to_string()]
    );
}

#[test]
fn unstructured_prose_never_yields_empty_lists() {
    let text = "I'm sorry, I cannot help with that request right now.";
    let result = parse_diagnosis(text);
    assert!(!result.conditions.is_empty());
    assert!(!result.tests.is_empty());
    assert!(!result.treatments.is_empty());
    assert!(!result.reasoning_tree.is_empty());
    assert!(result.warning_signs.is_empty());
}

#[test]
fn heading_without_bullets_uses_fallback() {
    let text = "✅ Possible Conditions:\nNothing specific stands out here.\n🧪 Tests:\n";
    let conditions = parse_conditions(text);
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].name, "Further evaluation needed");
}

// ---------------------------------------------------------------------------
// Line decomposition
// ---------------------------------------------------------------------------

#[test]
fn condition_with_confidence_and_percentage() {
    let conditions = parse_conditions("✅ Possible Conditions:\n• Hypertension - Confidence: High (85%)\n");
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].name, "Hypertension");
    assert_eq!(conditions[0].confidence.level, Level::High);
    assert_eq!(conditions[0].confidence.percentage, Some(85));
    assert_eq!(conditions[0].reasoning, "Based on symptom analysis");
}

#[test]
fn condition_without_confidence_defaults_to_medium() {
    let conditions = parse_conditions("✅ Conditions:\n- Migraine\n* Sinusitis\n");
    let names: Vec<_> = conditions.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Migraine", "Sinusitis"]);
    assert!(conditions.iter().all(|c| c.confidence.level == Level::Medium));
    assert!(conditions.iter().all(|c| c.confidence.percentage.is_none()));
}

#[test]
fn unknown_confidence_label_passes_through() {
    let conditions = parse_conditions("✅ Conditions:\n• Flu - Confidence: MODERATE (40%)\n");
    assert_eq!(
        conditions[0].confidence.level,
        Level::Unrecognized("Moderate".to_string())
    );
    assert_eq!(conditions[0].confidence.percentage, Some(40));
}

#[test]
fn detailed_test_line() {
    let tests = parse_tests("🧪 Recommended Tests:\n• CBC - Purpose: rule out infection - Urgency: Low\n");
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].name, "CBC");
    assert_eq!(tests[0].purpose.as_deref(), Some("rule out infection"));
    assert_eq!(tests[0].urgency, Some(Level::Low));
}

#[test]
fn plain_treatment_line_has_no_explanation() {
    let (treatments, _) = parse_treatments_and_warnings("💊 Treatment:\n• Rest\n");
    assert_eq!(treatments, vec![Treatment::action("Rest")]);
}

#[test]
fn explained_treatment_without_warnings() {
    let (treatments, warnings) =
        parse_treatments_and_warnings("💊 Treatment Recommendations:\n• Rest - Avoid strenuous activity\n");
    assert_eq!(treatments.len(), 1);
    assert_eq!(treatments[0].action, "Rest");
    assert_eq!(treatments[0].explanation.as_deref(), Some("Avoid strenuous activity"));
    assert!(warnings.is_empty());
}

#[test]
fn treatment_splits_at_first_spaced_hyphen() {
    let (treatments, _) =
        parse_treatments_and_warnings("💊 Treatments:\n• Ibuprofen - 400mg - with food\n");
    assert_eq!(treatments[0].action, "Ibuprofen");
    assert_eq!(treatments[0].explanation.as_deref(), Some("400mg - with food"));
}

#[test]
fn reasoning_drops_short_lines_and_keeps_prose() {
    let text = "🧠 Reasoning:\n• Pain\nFever → flu\n";
    assert_eq!(parse_reasoning(text), vec!["Fever → flu".to_string()]);
}

// ---------------------------------------------------------------------------
// Section location
// ---------------------------------------------------------------------------

#[test]
fn emoji_heading_takes_precedence_over_plain_word() {
    let text = "\
Conditions: see below
- Plain-word decoy

✅ Possible Conditions:
• Real condition
🧪 Tests:
";
    let conditions = parse_conditions(text);
    let names: Vec<_> = conditions.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Real condition"]);
}

#[test]
fn plain_word_headings_are_found_without_emoji() {
    let text = "\
Conditions:
- Migraine - Confidence: Low (20%)
Tests:
- MRI
Treatment:
- Rest - sleep in a dark room
Reasoning:
- Throbbing unilateral pain suggests migraine
";
    let result = parse_diagnosis(text);
    assert_eq!(result.conditions[0].name, "Migraine");
    assert_eq!(result.conditions[0].confidence.level, Level::Low);
    assert_eq!(result.tests[0].name, "MRI");
    assert_eq!(result.treatments[0].action, "Rest");
    assert_eq!(
        result.reasoning_tree,
        vec!["Throbbing unilateral pain suggests migraine".to_string()]
    );
}

#[test]
fn warnings_stop_at_blank_line() {
    let text = "🚨 When to See a Doctor:\n• Chest pain\n• Fainting\n\n• Not a warning\n";
    let (_, warnings) = parse_treatments_and_warnings(text);
    assert_eq!(warnings, vec!["Chest pain".to_string(), "Fainting".to_string()]);
}

#[test]
fn full_response_parses_every_section() {
    let result = parse_diagnosis(FULL_RESPONSE);

    let names: Vec<_> = result.conditions.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Hypertension", "Tension headache"]);
    assert_eq!(result.conditions[1].confidence.percentage, Some(60));

    assert_eq!(result.tests.len(), 2);
    assert_eq!(result.tests[1].name, "Blood pressure monitoring");
    assert_eq!(result.tests[1].urgency, Some(Level::Medium));

    assert_eq!(result.treatments.len(), 2);
    assert_eq!(result.treatments[0].action, "Rest");
    assert_eq!(
        result.treatments[0].explanation.as_deref(),
        Some("lie down in a quiet, dark room")
    );
    assert_eq!(result.treatments[1], Treatment::action("Hydration"));

    assert_eq!(
        result.warning_signs,
        vec!["Sudden severe headache".to_string(), "Vision changes".to_string()]
    );
    assert_eq!(result.reasoning_tree.len(), 2);
}

/// Laid out the way the symptoms template asks: numbered bold headings,
/// `Condition(s)`, a 🚨 block between 💊 and 🧠, and `---` separators.
const TEMPLATE_SHAPED_RESPONSE: &str = "\
---

1. ✅ **Possible Condition(s):**
   • Influenza - Confidence: High (80%)
   • Common cold - Confidence: Low

---

2. 🧪 **Recommended Tests:**
   • Rapid flu test - Purpose: confirm influenza - Urgency: High

3. 💊 **Treatment Recommendations:**
   • Rest - stay home for 3-5 days
   • Fluids

🚨 **When to See a Doctor:**
   • Difficulty breathing

4. 🧠 **Medical Reasoning:**
   • Fever and body aches → systemic infection → influenza likely
   • Rapid onset fits flu better than a cold

---
";

#[test]
fn template_shaped_response_parses_every_section() {
    let template = PromptKind::Symptoms.render("fever and body aches");
    assert!(template.contains("1. ✅ **Possible Condition(s):**"));

    let result = parse_diagnosis(TEMPLATE_SHAPED_RESPONSE);

    let names: Vec<_> = result.conditions.iter().map(|c| c.name.as_str()).collect();
    // A `---` rule inside a bulleted section is read as a `-` bullet.
    assert_eq!(names, ["Influenza", "Common cold", "--"]);
    assert_eq!(result.conditions[0].confidence.level, Level::High);
    assert_eq!(result.conditions[0].confidence.percentage, Some(80));
    assert_eq!(result.conditions[1].confidence.level, Level::Low);
    assert_eq!(result.conditions[1].confidence.percentage, None);
    assert_eq!(result.conditions[2].confidence.level, Level::Medium);

    assert_eq!(result.tests.len(), 1);
    assert_eq!(result.tests[0].name, "Rapid flu test");
    assert_eq!(result.tests[0].purpose.as_deref(), Some("confirm influenza"));
    assert_eq!(result.tests[0].urgency, Some(Level::High));

    assert_eq!(result.treatments.len(), 2);
    assert_eq!(result.treatments[0].action, "Rest");
    assert_eq!(result.treatments[0].explanation.as_deref(), Some("stay home for 3-5 days"));
    assert_eq!(result.treatments[1], Treatment::action("Fluids"));

    assert_eq!(result.warning_signs, vec!["Difficulty breathing".to_string()]);

    assert_eq!(
        result.reasoning_tree,
        vec![
            "Fever and body aches → systemic infection → influenza likely".to_string(),
            "Rapid onset fits flu better than a cold".to_string(),
        ]
    );
}

#[test]
fn parsing_is_deterministic() {
    assert_eq!(parse_diagnosis(FULL_RESPONSE), parse_diagnosis(FULL_RESPONSE));
}

// ---------------------------------------------------------------------------
// Error fallbacks
// ---------------------------------------------------------------------------

#[test]
fn oversized_input_yields_error_fallbacks() {
    let mut text = String::from(FULL_RESPONSE);
    text.push_str(&"x".repeat(MAX_RESPONSE_BYTES));

    let result = parse_diagnosis(&text);
    assert_eq!(result.conditions[0].name, "Analysis error - please try again");
    assert_eq!(result.conditions[0].reasoning, "Error in processing response");
    assert_eq!(result.tests[0].name, "Consult healthcare provider");
    assert_eq!(result.treatments, vec![Treatment::action("Consult healthcare provider")]);
    assert_eq!(
        result.warning_signs,
        vec!["Seek immediate medical attention if symptoms worsen".to_string()]
    );
    assert_eq!(
        result.reasoning_tree,
        vec!["Analysis based on reported symptoms".to_string()]
    );
}

#[test]
fn result_serializes_with_camel_case_keys() {
    let json = serde_json::to_value(parse_diagnosis(FULL_RESPONSE)).unwrap();
    assert!(json["warningSigns"].is_array());
    assert!(json["reasoningTree"].is_array());
    assert_eq!(json["conditions"][0]["confidence"]["level"], "High");
    assert_eq!(json["conditions"][0]["confidence"]["percentage"], 85);
}
