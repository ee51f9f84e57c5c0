use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which prompt template to wrap the user's text in.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    /// Full four-section analysis (conditions, tests, treatments, reasoning).
    #[default]
    Symptoms,
    /// Recommended tests only.
    Tests,
    /// Treatments plus when-to-see-a-doctor warning signs.
    Treatments,
    /// Reasoning chain only.
    Reasoning,
    /// Free-form health question for the wellness assistant.
    Advice,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Symptoms => "symptoms",
            Self::Tests => "tests",
            Self::Treatments => "treatments",
            Self::Reasoning => "reasoning",
            Self::Advice => "advice",
        }
    }

    /// Interpolate `input` into the template.
    pub fn render(&self, input: &str) -> String {
        let input = input.trim();
        match self {
            Self::Symptoms => format!(
                "You are a clinical AI assistant that analyzes human-reported symptoms and gives \
                 compact, medically careful diagnostic support. A user has reported the following \
                 symptoms:\n\n\
                 Symptoms: {input}\n\n\
                 Summarize your analysis under these four sections:\n\n\
                 ---\n\n\
                 1. ✅ **Possible Condition(s):**\n\
                 \x20  • [Condition] - Confidence: [High/Medium/Low] ([percentage]%)\n\
                 \x20  - List the most probable conditions (1-2 max)\n\
                 \x20  - Do not overdiagnose or assume rare diseases unless clearly indicated\n\n\
                 2. 🧪 **Recommended Tests:**\n\
                 \x20  • [Test Name] - Purpose: [Brief purpose] - Urgency: [High/Medium/Low]\n\
                 \x20  - Suggest relevant diagnostic tests, basic to advanced only if needed\n\n\
                 3. 💊 **Treatment Recommendations:**\n\
                 \x20  • [Treatment] - [Brief explanation]\n\
                 \x20  - Common approaches (OTC medicines, rest, hydration) and whether a doctor visit is advised\n\
                 \x20  - Do not suggest prescription-only medicines unless truly essential\n\n\
                 🚨 **When to See a Doctor:**\n\
                 \x20  • [Warning sign]\n\n\
                 4. 🧠 **Medical Reasoning:**\n\
                 \x20  • [Symptom] → [What it suggests] → [Clinical significance]\n\n\
                 ---\n\n\
                 📝 **Constraints**:\n\
                 - Keep all responses brief, readable, and professional\n\
                 - Base your output only on the symptoms provided\n\
                 - Prefer common, evidence-based medical knowledge\n\
                 - Always recommend consultation if symptoms are severe, persistent, or uncertain\n\n\
                 IMPORTANT: You MUST respond in this EXACT format with all sections present."
            ),
            Self::Tests => format!(
                "Analyze symptoms and suggest diagnostic tests:\n\n\
                 Symptoms: {input}\n\n\
                 Respond in this EXACT format:\n\n\
                 🧪 Recommended Tests:\n\
                 • [Test Name] - Purpose: [Brief purpose] - Urgency: [High/Medium/Low]\n\
                 • [Test Name] - Purpose: [Brief purpose] - Urgency: [High/Medium/Low]\n\n\
                 Provide 2-3 most relevant tests only."
            ),
            Self::Treatments => format!(
                "Provide treatment recommendations for these symptoms:\n\n\
                 Symptoms: {input}\n\n\
                 Respond in this EXACT format:\n\n\
                 💊 Treatment Recommendations:\n\
                 • [Treatment] - [Brief explanation]\n\
                 • [Treatment] - [Brief explanation]\n\n\
                 🚨 When to See a Doctor:\n\
                 • [Warning sign]\n\
                 • [Warning sign]\n\n\
                 Focus on OTC medications and general care. Be medically responsible."
            ),
            Self::Reasoning => format!(
                "Explain the medical reasoning for these symptoms:\n\n\
                 Symptoms: {input}\n\n\
                 Respond in this EXACT format:\n\n\
                 🧠 Medical Reasoning:\n\
                 • [Symptom] → [What it suggests] → [Clinical significance]\n\
                 • [Pattern] → [Likely mechanism] → [Why it matters]\n\n\
                 Provide 2-3 key reasoning points maximum."
            ),
            Self::Advice => format!(
                "You are Aether, a friendly medical AI assistant that helps with health and \
                 wellness questions in a warm, caring tone.\n\n\
                 User question: \"{input}\"\n\n\
                 Guidelines for your response:\n\
                 - If the question is about health or wellness (symptoms, medications, nutrition, \
                 exercise, mental health, first aid, preventive care), give helpful advice\n\
                 - For clearly non-medical questions, politely redirect: \"I'm Aether, your medical \
                 assistant. I'm here to help with health and wellness questions. Is there anything \
                 about your health I can help you with today?\"\n\
                 - Use clear bullet points (•) for lists and proper paragraph breaks\n\
                 - Always recommend consulting healthcare professionals for serious symptoms\n\
                 - Keep responses concise but informative\n\n\
                 Please provide your response now:"
            ),
        }
    }
}
