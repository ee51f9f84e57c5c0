use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Config, GeminiConfig};
use crate::dispatch::http::GeminiDispatch;
use crate::dispatch::{ProviderRequest, ProviderResult};
use crate::error::AetherError;
use crate::parsers::parse_diagnosis;
use crate::prompts::PromptKind;
use crate::store::{self, SessionStore};
use crate::types::{DiagnosisResult, UserRole};

/// Shortest accepted symptom description, in characters after trimming.
pub const MIN_SYMPTOM_CHARS: usize = 10;

pub fn validate_symptoms(symptoms: &str) -> Result<(), AetherError> {
    if symptoms.trim().chars().count() < MIN_SYMPTOM_CHARS {
        return Err(AetherError::InvalidInput(
            "Please describe your symptoms in more detail".to_string(),
        ));
    }
    Ok(())
}

/// Who a diagnosis is saved for.
#[derive(Debug, Clone, Copy)]
pub struct Requester<'a> {
    pub user_id: &'a str,
    pub role: UserRole,
}

#[derive(Debug)]
pub struct DiagnosisOutcome {
    pub result: DiagnosisResult,
    pub model: String,
    pub provider: String,
    /// Set when the session was persisted.
    pub saved: Option<SavedSession>,
}

#[derive(Debug)]
pub struct SavedSession {
    pub id: String,
    pub path: PathBuf,
}

/// Runs the symptom-analysis flow: prompt, completion, parse, persist.
pub struct Diagnoser {
    dispatch: GeminiDispatch,
    gemini: Option<GeminiConfig>,
    model: String,
    timeout: Duration,
    store: Arc<SessionStore>,
}

impl Diagnoser {
    pub fn new(config: &Config, store: Arc<SessionStore>) -> Result<Self, AetherError> {
        Ok(Self {
            dispatch: GeminiDispatch::new()?,
            gemini: config.gemini.clone(),
            model: config.model.clone(),
            timeout: config.timeout,
            store,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Wrap `input` in the selected template and send it to the model.
    pub async fn complete(
        &self,
        kind: PromptKind,
        input: &str,
    ) -> Result<ProviderResult, AetherError> {
        let gemini = self
            .gemini
            .as_ref()
            .ok_or_else(|| AetherError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let req = ProviderRequest {
            prompt: kind.render(input),
            model: self.model.clone(),
            deadline: Instant::now() + self.timeout,
        };

        tracing::info!(prompt = kind.as_str(), model = %self.model, "requesting analysis");
        self.dispatch
            .query_model(&req, &gemini.base_url, &gemini.api_key)
            .await
    }

    /// Analyze symptoms into a structured result using the full template.
    pub async fn diagnose(
        &self,
        symptoms: &str,
        requester: Option<Requester<'_>>,
    ) -> Result<DiagnosisOutcome, AetherError> {
        self.diagnose_with(PromptKind::Symptoms, symptoms, requester)
            .await
    }

    /// Analyze symptoms with a chosen template. Sections the template does not
    /// ask for come back as their fallbacks.
    ///
    /// Completion failures are returned. Persistence failures are logged and
    /// leave `saved` empty.
    pub async fn diagnose_with(
        &self,
        kind: PromptKind,
        symptoms: &str,
        requester: Option<Requester<'_>>,
    ) -> Result<DiagnosisOutcome, AetherError> {
        if kind == PromptKind::Advice {
            return Err(AetherError::InvalidInput(
                "focus must be symptoms, tests, treatments or reasoning".to_string(),
            ));
        }
        validate_symptoms(symptoms)?;
        if let Some(r) = &requester {
            store::validate_user_id(r.user_id)?;
        }

        let completion = self.complete(kind, symptoms).await?;
        let result = parse_diagnosis(&completion.text);
        tracing::info!(
            conditions = result.conditions.len(),
            tests = result.tests.len(),
            treatments = result.treatments.len(),
            warnings = result.warning_signs.len(),
            latency_ms = completion.latency_ms,
            "analysis complete"
        );

        let saved = match requester {
            Some(r) => self.persist(r, symptoms, &result).await,
            None => None,
        };

        Ok(DiagnosisOutcome {
            result,
            model: completion.model,
            provider: completion.provider,
            saved,
        })
    }

    async fn persist(
        &self,
        requester: Requester<'_>,
        symptoms: &str,
        result: &DiagnosisResult,
    ) -> Option<SavedSession> {
        let record = self
            .store
            .new_record(requester.user_id, requester.role, symptoms, result.clone());
        match self.store.save(&record).await {
            Ok(path) => Some(SavedSession {
                id: record.id,
                path,
            }),
            Err(e) => {
                tracing::warn!("failed to save diagnosis session: {e}");
                None
            }
        }
    }
}
