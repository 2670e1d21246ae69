//! Response strategies selected by the classified intent.

pub mod casual;
pub mod refusal;
pub mod retrieval;

pub use casual::CasualStrategy;
pub use refusal::RefusalStrategy;
pub use retrieval::{HelpOutcome, RetrievalStrategy};

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::ConversationHistory;
use crate::error::Result;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::GenerationSettings;

/// A way of answering the current conversation.
#[async_trait]
pub trait ResponseStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Respond to the conversation, extending `history` as needed.
    ///
    /// Returns the user-visible reply, or `None` for strategies that only
    /// prepare context for another one.
    async fn respond(&self, history: &mut ConversationHistory) -> Result<Option<String>>;
}

/// Sends the windowed history under a fixed instruction and records the
/// reply as an assistant turn.
#[derive(Clone)]
pub(crate) struct InstructedReply {
    provider: Arc<dyn ModelProvider>,
    instruction: String,
    settings: GenerationSettings,
}

impl InstructedReply {
    pub(crate) fn new(
        provider: Arc<dyn ModelProvider>,
        instruction: impl Into<String>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            instruction: instruction.into(),
            settings,
        }
    }

    pub(crate) async fn reply(&self, history: &mut ConversationHistory) -> Result<String> {
        let request = ProviderRequest::over_history(
            Some(self.instruction.clone()),
            history.window().to_vec(),
        )
        .with_settings(self.settings.clone());
        let response = self.provider.generate_text(&request).await?;
        history.push_assistant(response.text.clone());
        Ok(response.text)
    }
}
