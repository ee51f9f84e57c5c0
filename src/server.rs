use std::sync::Arc;
use std::time::Instant;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use crate::config::Config;
use crate::diagnosis::{self, Diagnoser, Requester};
use crate::error::AetherError;
use crate::parsers::parse_diagnosis;
use crate::prompts::PromptKind;
use crate::report::render_report;
use crate::response::{ToolMetadata, ToolResponse};
use crate::store::{self, SessionStore};
use crate::tools::ask::AskRequest;
use crate::tools::diagnose::DiagnoseRequest;
use crate::tools::enums::ResponseFormat;
use crate::tools::history::HistoryRequest;
use crate::tools::parse::ParseRequest;
use crate::types::DiagnosisResult;

#[derive(Clone)]
pub struct AetherServer {
    diagnoser: Arc<Diagnoser>,
    store: Arc<SessionStore>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AetherServer {
    pub fn new(config: Config) -> Result<Self, AetherError> {
        let store = Arc::new(SessionStore::new(config.store_dir.clone()));
        let diagnoser = Arc::new(Diagnoser::new(&config, store.clone())?);
        Ok(Self {
            diagnoser,
            store,
            tool_router: Self::tool_router(),
        })
    }

    #[tool(
        name = "diagnose",
        description = "Analyze a free-text symptom description with the AI model and return possible conditions, recommended tests, treatments, warning signs and reasoning. Pass `user_id` to save the session; `focus` narrows the analysis to one section."
    )]
    async fn diagnose(
        &self,
        Parameters(req): Parameters<DiagnoseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let focus = req.focus.unwrap_or_default();
        if focus == PromptKind::Advice {
            return Err(McpError::invalid_params(
                "focus must be symptoms, tests, treatments or reasoning",
                None,
            ));
        }
        diagnosis::validate_symptoms(&req.symptoms)
            .map_err(|e| McpError::invalid_params(e.user_message(), None))?;
        if let Some(user_id) = req.user_id.as_deref() {
            store::validate_user_id(user_id)
                .map_err(|e| McpError::invalid_params(e.user_message(), None))?;
        }

        let start = Instant::now();
        let requester = req.user_id.as_deref().map(|user_id| Requester {
            user_id,
            role: req.user_role.unwrap_or_default(),
        });
        let format = req.response_format.unwrap_or_default();

        let outcome = self
            .diagnoser
            .diagnose_with(focus, &req.symptoms, requester)
            .await;
        let response = match outcome {
            Ok(outcome) => {
                let metadata = ToolMetadata {
                    tool_name: "diagnose".to_string(),
                    model_used: outcome.model,
                    provider_used: outcome.provider,
                    duration_seconds: start.elapsed().as_secs_f64(),
                    session_id: outcome.saved.map(|s| s.id),
                };
                rendered(&outcome.result, format, metadata)
            }
            Err(e) => {
                tracing::warn!("diagnosis failed: {e}");
                ToolResponse::error(
                    format!("Analysis failed: {}", e.user_message()),
                    ToolMetadata {
                        tool_name: "diagnose".to_string(),
                        model_used: self.diagnoser.model().to_string(),
                        provider_used: e.provider().unwrap_or("unknown").to_string(),
                        duration_seconds: start.elapsed().as_secs_f64(),
                        session_id: None,
                    },
                )
            }
        };

        Ok(response.into_call_tool_result())
    }

    #[tool(
        name = "parse_response",
        description = "Parse raw symptom-analysis text (✅ conditions, 🧪 tests, 💊 treatments, 🚨 warnings, 🧠 reasoning) into a structured result without calling a model. Text over 2 MiB is not scanned and every section returns its error fallback.",
        annotations(read_only_hint = true)
    )]
    async fn parse_response(
        &self,
        Parameters(req): Parameters<ParseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let result = parse_diagnosis(&req.text);
        let format = req.response_format.unwrap_or_default();
        let response = rendered(
            &result,
            format,
            ToolMetadata::local("parse_response", start.elapsed().as_secs_f64()),
        );
        Ok(response.into_call_tool_result())
    }

    #[tool(
        name = "ask",
        description = "Ask the Aether wellness assistant a general health question. Returns the model's answer as text.",
        annotations(read_only_hint = true)
    )]
    async fn ask(&self, Parameters(req): Parameters<AskRequest>) -> Result<CallToolResult, McpError> {
        if req.question.trim().is_empty() {
            return Err(McpError::invalid_params("question must not be empty", None));
        }

        let start = Instant::now();
        let response = match self.diagnoser.complete(PromptKind::Advice, &req.question).await {
            Ok(result) => ToolResponse::success(
                result.text,
                "text",
                ToolMetadata {
                    tool_name: "ask".to_string(),
                    model_used: result.model,
                    provider_used: result.provider,
                    duration_seconds: start.elapsed().as_secs_f64(),
                    session_id: None,
                },
            ),
            Err(e) => {
                tracing::warn!("advice query failed: {e}");
                ToolResponse::error(
                    format!("Medical advice failed: {}", e.user_message()),
                    ToolMetadata {
                        tool_name: "ask".to_string(),
                        model_used: self.diagnoser.model().to_string(),
                        provider_used: e.provider().unwrap_or("unknown").to_string(),
                        duration_seconds: start.elapsed().as_secs_f64(),
                        session_id: None,
                    },
                )
            }
        };

        Ok(response.into_call_tool_result())
    }

    #[tool(
        name = "history",
        description = "List a user's saved diagnosis sessions, newest first.",
        annotations(read_only_hint = true)
    )]
    async fn history(
        &self,
        Parameters(req): Parameters<HistoryRequest>,
    ) -> Result<CallToolResult, McpError> {
        store::validate_user_id(&req.user_id)
            .map_err(|e| McpError::invalid_params(e.user_message(), None))?;
        let limit = req
            .limit()
            .map_err(|e| McpError::invalid_params(e.user_message(), None))?;

        let start = Instant::now();
        let records = self
            .store
            .recent(&req.user_id, limit)
            .await
            .map_err(|e| {
                tracing::warn!("history read failed: {e}");
                McpError::internal_error(e.user_message(), None)
            })?;

        let content = serde_json::to_string_pretty(&records)
            .map_err(|e| McpError::internal_error(format!("serialization failed: {e}"), None))?;
        let response = ToolResponse::success(
            content,
            "json",
            ToolMetadata::local("history", start.elapsed().as_secs_f64()),
        );
        Ok(response.into_call_tool_result())
    }
}

/// Render a result in the requested format, wrapped in a success envelope.
fn rendered(result: &DiagnosisResult, format: ResponseFormat, metadata: ToolMetadata) -> ToolResponse {
    match format {
        ResponseFormat::Markdown => ToolResponse::success(render_report(result), "markdown", metadata),
        ResponseFormat::Json => match serde_json::to_string_pretty(result) {
            Ok(json) => ToolResponse::success(json, "json", metadata),
            Err(e) => ToolResponse::error(format!("serialization failed: {e}"), metadata),
        },
    }
}

#[tool_handler]
impl ServerHandler for AetherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "aether".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Aether: AI-assisted symptom analysis. Results are not a substitute for professional medical advice.\n\n\
                 Workflow:\n\
                 1. Call `diagnose` with a symptom description (at least 10 characters).\n\
                    - Pass `user_id` to save the session; `history` lists saved sessions.\n\
                    - `response_format: \"markdown\"` returns a printable report.\n\
                 2. Call `parse_response` to structure model text you already have.\n\
                 3. Call `ask` for general health and wellness questions."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
