//! Conversation history owned by the orchestrator.

use crate::types::{ModelMessage, Role, ToolResult};

/// Append-only, chronologically ordered conversation turns.
///
/// The full history is kept; [`window`](Self::window) bounds what is sent
/// to the model.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<ModelMessage>,
    context_window: usize,
}

impl ConversationHistory {
    /// `context_window` is the maximum number of turns sent to the model;
    /// 0 sends everything.
    pub fn new(context_window: usize) -> Self {
        Self {
            messages: Vec::new(),
            context_window,
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ModelMessage::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ModelMessage::assistant(text));
    }

    /// Append a structured call turn and its result turn together.
    ///
    /// `call` must be an assistant turn carrying the call `result` answers.
    pub fn push_capability_exchange(&mut self, call: ModelMessage, result: ToolResult) {
        debug_assert_eq!(call.role, Role::Assistant);
        debug_assert!(call.tool_calls().iter().any(|c| c.id == result.call_id));
        self.messages.push(call);
        self.messages.push(ModelMessage::tool_result(result));
    }

    /// All turns.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// The most recent turns, at most `context_window` of them.
    ///
    /// The window always opens on a user turn, so a call turn or its result
    /// is never sent without what precedes it. When the last
    /// `context_window` turns hold no user turn, the window reaches back to
    /// the most recent one instead of going empty.
    pub fn window(&self) -> &[ModelMessage] {
        if self.context_window == 0 || self.messages.len() <= self.context_window {
            return &self.messages;
        }
        let cut = self.messages.len() - self.context_window;
        let start = self.messages[cut..]
            .iter()
            .position(|m| m.role == Role::User)
            .map(|offset| cut + offset)
            .or_else(|| self.messages.iter().rposition(|m| m.role == Role::User))
            .unwrap_or(0);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
