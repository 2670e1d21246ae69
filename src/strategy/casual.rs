//! Empathetic counselor conversation (intent `None`).

use std::sync::Arc;

use async_trait::async_trait;

use super::{InstructedReply, ResponseStrategy};
use crate::agent::ConversationHistory;
use crate::error::Result;
use crate::prompts::COUNSELOR_INSTRUCTION;
use crate::provider::ModelProvider;
use crate::types::GenerationSettings;

/// Default conversational path; also produces the final reply after
/// retrieval.
#[derive(Clone)]
pub struct CasualStrategy {
    inner: InstructedReply,
}

impl CasualStrategy {
    pub fn new(provider: Arc<dyn ModelProvider>, settings: GenerationSettings) -> Self {
        Self {
            inner: InstructedReply::new(provider, COUNSELOR_INSTRUCTION, settings),
        }
    }

    /// Reply to the conversation and append the reply as an assistant turn.
    pub async fn reply(&self, history: &mut ConversationHistory) -> Result<String> {
        self.inner.reply(history).await
    }
}

#[async_trait]
impl ResponseStrategy for CasualStrategy {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn respond(&self, history: &mut ConversationHistory) -> Result<Option<String>> {
        self.reply(history).await.map(Some)
    }
}
