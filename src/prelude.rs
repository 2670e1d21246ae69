//! Convenience re-exports for common use.

pub use crate::agent::{ConversationHistory, Orchestrator, TurnOutcome, TurnState};
pub use crate::cache::{AccessCache, IndexList};
pub use crate::classifier::{IntentClassifier, IntentLabel, IntentMatching};
pub use crate::config::{AgentSettings, CounselConfig};
pub use crate::corpus::{CorpusSource, CorpusStore, DialogueRecord, KeywordSet};
pub use crate::error::{CounselError, Result, ValidationError};
pub use crate::models::LanguageModel;
pub use crate::provider::ModelProvider;
pub use crate::strategy::{HelpOutcome, ResponseStrategy};
pub use crate::tools::{FetchAdviceTool, Summarizer, Tool, ToolArguments};
pub use crate::types::{GenerationSettings, ModelMessage, Role, ToolCall, ToolResult, Usage};
