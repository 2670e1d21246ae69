//! Conversation orchestration: history, the turn state machine and the
//! interactive loop.

pub mod conversation;
pub mod orchestrator;
pub mod repl;

pub use conversation::ConversationHistory;
pub use orchestrator::{Orchestrator, TurnOutcome, TurnState};
pub use repl::run_repl;
