//! Turn state machine routing each user input to a response strategy.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::conversation::ConversationHistory;
use crate::classifier::{IntentClassifier, IntentLabel};
use crate::config::AgentSettings;
use crate::error::{CounselError, Result};
use crate::provider::ModelProvider;
use crate::strategy::{CasualStrategy, HelpOutcome, RefusalStrategy, RetrievalStrategy};
use crate::tools::Tool;
use crate::types::Usage;

/// Inputs that end the session.
const SHUTDOWN_COMMANDS: [&str; 2] = ["/exit", "/quit"];

/// Where the orchestrator is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingInput,
    Classifying,
    RespondingNone,
    RespondingFallback,
    RespondingHelpThenNone,
    Terminated,
}

/// Result of handling one user input.
#[derive(Debug)]
pub enum TurnOutcome {
    /// A strategy replied; for help turns `help` says what retrieval did.
    Replied {
        intent: IntentLabel,
        reply: String,
        help: Option<HelpOutcome>,
    },
    /// The classifier named no single label; nothing was said.
    Unrouted { raw: String },
    /// The session ended.
    Shutdown,
}

impl TurnOutcome {
    pub fn reply(&self) -> Option<&str> {
        match self {
            Self::Replied { reply, .. } => Some(reply),
            _ => None,
        }
    }
}

/// Owns the conversation and drives classification and the strategies.
///
/// Turns are processed one at a time; `&mut self` keeps a second turn from
/// starting before the first completes.
pub struct Orchestrator {
    classifier: IntentClassifier,
    casual: CasualStrategy,
    refusal: RefusalStrategy,
    retrieval: RetrievalStrategy,
    history: ConversationHistory,
    state: TurnState,
    usage: Usage,
}

impl Orchestrator {
    /// Wire every component to one provider, configured from `settings`.
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        tool: Arc<dyn Tool>,
        settings: &AgentSettings,
    ) -> Self {
        let generation = settings.generation.clone();
        Self::from_parts(
            IntentClassifier::new(provider.clone())
                .with_matching(settings.intent_matching)
                .with_settings(generation.clone()),
            CasualStrategy::new(provider.clone(), generation.clone()),
            RefusalStrategy::new(provider.clone(), generation.clone()),
            RetrievalStrategy::new(provider, tool, generation),
            ConversationHistory::new(settings.context_window),
        )
    }

    pub fn from_parts(
        classifier: IntentClassifier,
        casual: CasualStrategy,
        refusal: RefusalStrategy,
        retrieval: RetrievalStrategy,
        history: ConversationHistory,
    ) -> Self {
        Self {
            classifier,
            casual,
            refusal,
            retrieval,
            history,
            state: TurnState::AwaitingInput,
            usage: Usage::default(),
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == TurnState::Terminated
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Handle a raw input line: shutdown commands end the session, anything
    /// else is a conversational turn.
    pub async fn handle_input(&mut self, line: &str) -> Result<TurnOutcome> {
        let trimmed = line.trim();
        if SHUTDOWN_COMMANDS
            .iter()
            .any(|cmd| trimmed.eq_ignore_ascii_case(cmd))
        {
            return Ok(self.shutdown());
        }
        self.handle_turn(line).await
    }

    /// Process one user turn to completion.
    ///
    /// The user text is appended to history before classification. Model
    /// errors from classification or the replying strategy propagate; the
    /// orchestrator is then ready for the next turn.
    pub async fn handle_turn(&mut self, user_text: &str) -> Result<TurnOutcome> {
        if self.state != TurnState::AwaitingInput {
            return Err(CounselError::InvalidState(format!(
                "cannot accept input in state {:?}",
                self.state
            )));
        }

        let outcome = self.run_turn(user_text).await;
        self.state = TurnState::AwaitingInput;
        outcome
    }

    /// Move to [`TurnState::Terminated`]. Idempotent.
    pub fn shutdown(&mut self) -> TurnOutcome {
        if self.state != TurnState::Terminated {
            info!(
                turns = self.history.len(),
                classification_tokens = self.usage.total_tokens,
                "conversation ended"
            );
        }
        self.state = TurnState::Terminated;
        TurnOutcome::Shutdown
    }

    async fn run_turn(&mut self, user_text: &str) -> Result<TurnOutcome> {
        self.state = TurnState::Classifying;
        self.history.push_user(user_text);

        let classification = self.classifier.classify(user_text).await?;
        self.usage.merge(&classification.usage);

        let Some(intent) = classification.label else {
            warn!(raw = %classification.raw.trim(), "unrecognized intent; no reply produced");
            return Ok(TurnOutcome::Unrouted {
                raw: classification.raw,
            });
        };
        debug!(%intent, "routing turn");

        let (reply, help) = match intent {
            IntentLabel::None => {
                self.state = TurnState::RespondingNone;
                (self.casual.reply(&mut self.history).await?, None)
            }
            IntentLabel::Fallback => {
                self.state = TurnState::RespondingFallback;
                (self.refusal.reply(&mut self.history).await?, None)
            }
            IntentLabel::Help => {
                self.state = TurnState::RespondingHelpThenNone;
                let help = self.retrieval.augment(&mut self.history).await;
                (self.casual.reply(&mut self.history).await?, Some(help))
            }
        };

        Ok(TurnOutcome::Replied {
            intent,
            reply,
            help,
        })
    }
}
