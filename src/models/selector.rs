//! Model selection and parsing.

use std::str::FromStr;

use super::LanguageModel;
use crate::error::CounselError;

/// Parse a "provider:model" string into a LanguageModel.
pub struct ModelSelector;

impl ModelSelector {
    /// Parse "provider:model_id" into a LanguageModel.
    ///
    /// Examples: "google:gemini-2.0-flash-001", "gemini:gemini-2.5-flash"
    pub fn parse(s: &str) -> Result<LanguageModel, CounselError> {
        let (provider, model_id) = s.split_once(':').ok_or_else(|| {
            CounselError::Configuration(format!(
                "Invalid model selector '{s}': expected 'provider:model_id'"
            ))
        })?;
        if model_id.is_empty() {
            return Err(CounselError::Configuration(format!(
                "Invalid model selector '{s}': empty model id"
            )));
        }

        match provider {
            #[cfg(feature = "google")]
            "google" | "gemini" => {
                use super::google::GoogleModel;
                let m = GoogleModel::from_str(model_id)
                    .unwrap_or(GoogleModel::Custom(model_id.to_string()));
                Ok(LanguageModel::Google(m))
            }
            _ => Ok(LanguageModel::Custom {
                provider: provider.to_string(),
                model_id: model_id.to_string(),
            }),
        }
    }
}

impl FromStr for LanguageModel {
    type Err = CounselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSelector::parse(s)
    }
}
