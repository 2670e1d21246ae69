//! Intent classification of raw user text.

mod label;

pub use label::{resolve_label, IntentLabel, IntentMatching};

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::prompts::INTENT_INSTRUCTION;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::{GenerationSettings, Usage};

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Reply text exactly as the model produced it.
    pub raw: String,
    /// Label resolved from `raw`; `None` when the reply names no single label.
    pub label: Option<IntentLabel>,
    pub usage: Usage,
}

/// Labels user text with a single model call.
///
/// The request carries only the classification instruction and the user
/// text; conversation history is not sent.
#[derive(Clone)]
pub struct IntentClassifier {
    provider: Arc<dyn ModelProvider>,
    matching: IntentMatching,
    settings: GenerationSettings,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            matching: IntentMatching::default(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_matching(mut self, matching: IntentMatching) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn matching(&self) -> IntentMatching {
        self.matching
    }

    pub async fn classify(&self, user_text: &str) -> Result<Classification> {
        let request = ProviderRequest::single_turn(INTENT_INSTRUCTION, user_text)
            .with_settings(self.settings.clone());
        let response = self.provider.generate_text(&request).await?;
        let label = resolve_label(&response.text, self.matching);
        debug!(raw = %response.text.trim(), ?label, "intent classified");
        Ok(Classification {
            raw: response.text,
            label,
            usage: response.usage,
        })
    }

    /// Classify loosely typed input; anything but a string is rejected
    /// before the model is contacted.
    pub async fn classify_value(&self, input: &Value) -> Result<Classification> {
        let text = input
            .as_str()
            .ok_or_else(|| ValidationError::type_mismatch("user_text", "string", input))?;
        self.classify(text).await
    }
}
