//! Model service boundary: provider trait and implementations.

pub mod http;

#[cfg(feature = "google")]
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CounselConfig;
use crate::error::CounselError;
use crate::models::{capabilities::ModelCapabilities, LanguageModel};
use crate::types::{FinishReason, GenerationSettings, ModelMessage, ToolCall, Usage};
use crate::util::retry::RetryPolicy;

/// A request sent to a model provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    /// Instruction applied to the whole request (system prompt).
    pub system_instruction: Option<String>,
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

impl ProviderRequest {
    /// A single-turn request: one instruction, one user text, no tools.
    pub fn single_turn(instruction: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            system_instruction: Some(instruction.into()),
            messages: vec![ModelMessage::user(text)],
            ..Default::default()
        }
    }

    /// A request over existing conversation turns.
    pub fn over_history(instruction: Option<String>, messages: Vec<ModelMessage>) -> Self {
        Self {
            system_instruction: instruction,
            messages,
            ..Default::default()
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }
}

/// Tool declaration sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider: free text, structured calls, or both.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "google").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Capabilities of the model.
    fn capabilities(&self) -> &ModelCapabilities;

    /// Generate a reply (non-streaming).
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, CounselError>;
}

/// Create a provider for the given model, using the provided config.
#[allow(unused_variables)]
pub fn create_provider(
    model: &LanguageModel,
    config: &CounselConfig,
) -> Result<Arc<dyn ModelProvider>, CounselError> {
    match model {
        #[cfg(feature = "google")]
        LanguageModel::Google(m) => {
            let api_key = config
                .get_api_key("google")
                .ok_or_else(|| CounselError::Authentication("Missing GOOGLE_API_KEY".into()))?;
            let retry = RetryPolicy {
                max_attempts: config.settings().retry_attempts.max(1),
                ..RetryPolicy::default()
            };
            Ok(Arc::new(
                google::GoogleProvider::new(m.clone(), api_key, config.get_base_url("google"))
                    .with_retry_policy(retry),
            ))
        }
        LanguageModel::Custom { provider, .. } => Err(CounselError::ModelNotFound(format!(
            "No built-in provider for '{provider}'"
        ))),
    }
}
