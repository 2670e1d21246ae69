//! Structured capabilities the model may invoke instead of replying.

pub mod arguments;
pub mod fetch_advice;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use fetch_advice::{FetchAdviceTool, Summarizer, FETCH_ADVICE};
pub use tool::Tool;
pub use types::ToolParameters;
