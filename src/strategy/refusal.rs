//! Polite refusal of out-of-scope requests (intent `Fallback`).

use std::sync::Arc;

use async_trait::async_trait;

use super::{InstructedReply, ResponseStrategy};
use crate::agent::ConversationHistory;
use crate::error::Result;
use crate::prompts::REFUSAL_INSTRUCTION;
use crate::provider::ModelProvider;
use crate::types::GenerationSettings;

/// Apologizes for not helping. The apology is kept in history like any
/// other assistant reply.
#[derive(Clone)]
pub struct RefusalStrategy {
    inner: InstructedReply,
}

impl RefusalStrategy {
    pub fn new(provider: Arc<dyn ModelProvider>, settings: GenerationSettings) -> Self {
        Self {
            inner: InstructedReply::new(provider, REFUSAL_INSTRUCTION, settings),
        }
    }

    pub async fn reply(&self, history: &mut ConversationHistory) -> Result<String> {
        self.inner.reply(history).await
    }
}

#[async_trait]
impl ResponseStrategy for RefusalStrategy {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn respond(&self, history: &mut ConversationHistory) -> Result<Option<String>> {
        self.reply(history).await.map(Some)
    }
}
