//! Retrieval-augmented preparation for help requests (intent `Help`).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::ResponseStrategy;
use crate::agent::ConversationHistory;
use crate::error::{CounselError, Result};
use crate::provider::{ModelProvider, ProviderRequest};
use crate::tools::{Tool, ToolArguments};
use crate::types::{GenerationSettings, ModelMessage, ToolCall, ToolResult};

/// What the retrieval step did to the conversation.
#[derive(Debug)]
pub enum HelpOutcome {
    /// The call turn and its result turn were appended.
    Augmented { call: ToolCall, result: Value },
    /// The model answered without requesting the capability, or cannot
    /// make structured calls at all.
    NoCapabilityCall,
    /// The capability ran but found nothing relevant.
    NoMatches { call: ToolCall },
    /// Extraction or retrieval failed; history is unchanged.
    Failed(CounselError),
}

impl HelpOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Lets the model extract search keywords from the conversation, runs the
/// retrieval capability, and records the exchange in history.
///
/// Never produces a reply; the casual strategy answers afterwards.
#[derive(Clone)]
pub struct RetrievalStrategy {
    provider: Arc<dyn ModelProvider>,
    tool: Arc<dyn Tool>,
    settings: GenerationSettings,
}

impl RetrievalStrategy {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        tool: Arc<dyn Tool>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            tool,
            settings,
        }
    }

    /// Run extraction and retrieval. Errors are absorbed into
    /// [`HelpOutcome::Failed`] and logged.
    pub async fn augment(&self, history: &mut ConversationHistory) -> HelpOutcome {
        match self.try_augment(history).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(
                    tool = self.tool.name(),
                    category = ?error.category(),
                    error = %error,
                    "help retrieval failed; continuing without it"
                );
                HelpOutcome::Failed(error)
            }
        }
    }

    async fn try_augment(&self, history: &mut ConversationHistory) -> Result<HelpOutcome> {
        if !self.provider.capabilities().supports_tools {
            debug!(
                model = self.provider.model_id(),
                "model cannot make structured calls; skipping retrieval"
            );
            return Ok(HelpOutcome::NoCapabilityCall);
        }
        let request = ProviderRequest::over_history(None, history.window().to_vec())
            .with_tools(vec![self.tool.definition()])
            .with_settings(self.settings.clone());
        let response = self.provider.generate_text(&request).await?;

        let Some(call) = response.tool_calls.into_iter().next() else {
            debug!("model did not request {}", self.tool.name());
            return Ok(HelpOutcome::NoCapabilityCall);
        };
        if call.name != self.tool.name() {
            return Err(CounselError::ToolExecution {
                tool_name: call.name,
                message: "unknown capability requested".to_string(),
            });
        }

        let args = ToolArguments::new(call.arguments.clone());
        let value = self.tool.execute(&args).await?;
        if value.get("results").is_some_and(Value::is_null) {
            debug!(tool = %call.name, "retrieval found no matching records");
            return Ok(HelpOutcome::NoMatches { call });
        }

        let call_turn = ModelMessage::assistant_tool_calls(response.text, vec![call.clone()]);
        history.push_capability_exchange(call_turn, ToolResult::success(&call, value.clone()));
        debug!(tool = %call.name, "conversation augmented with retrieval result");
        Ok(HelpOutcome::Augmented {
            call,
            result: value,
        })
    }
}

#[async_trait]
impl ResponseStrategy for RetrievalStrategy {
    fn name(&self) -> &'static str {
        "help"
    }

    async fn respond(&self, history: &mut ConversationHistory) -> Result<Option<String>> {
        self.augment(history).await;
        Ok(None)
    }
}
