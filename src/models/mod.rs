//! Model definitions and selection.

pub mod capabilities;
#[cfg(feature = "google")]
pub mod google;
pub mod selector;

pub use capabilities::ModelCapabilities;
pub use selector::ModelSelector;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language model identifier, dispatching to provider-specific variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "provider", content = "model")]
pub enum LanguageModel {
    #[cfg(feature = "google")]
    Google(google::GoogleModel),
    /// Model served by a provider this crate has no adapter for.
    Custom { provider: String, model_id: String },
}

impl LanguageModel {
    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            #[cfg(feature = "google")]
            Self::Google(m) => m.as_str(),
            Self::Custom { model_id, .. } => model_id,
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        match self {
            #[cfg(feature = "google")]
            Self::Google(_) => "google",
            Self::Custom { provider, .. } => provider,
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}
