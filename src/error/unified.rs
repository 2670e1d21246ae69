//! Error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    Validation,
    Storage,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    IncreaseTimeout,
    FixInput,
    CheckToolImplementation,
    ContactSupport,
}

impl RecoverySuggestion {
    /// Short hint for the person running the agent, if there is one.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::CheckCredentials => Some("set GOOGLE_API_KEY (or GEMINI_API_KEY)"),
            Self::CheckConfiguration => {
                Some("check counselor.toml, the COUNSELOR_* variables and the corpus location")
            }
            Self::RetryWithBackoff => Some("the model service is busy; try again shortly"),
            Self::IncreaseTimeout => Some("the model service did not answer in time"),
            _ => None,
        }
    }
}
