//! `fetchAdvice`: keyword retrieval over the corpus, condensed by the model.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::ToolParameters;
use super::validation::validate_arguments;
use crate::cache::{AccessCache, IndexList};
use crate::corpus::{CorpusStore, KeywordSet};
use crate::error::Result;
use crate::prompts::{FETCH_ADVICE_DESCRIPTION, SUMMARY_INSTRUCTION};
use crate::provider::{ModelProvider, ProviderRequest};
use crate::types::GenerationSettings;

pub const FETCH_ADVICE: &str = "fetchAdvice";

/// Single-shot summarization of retrieved text.
#[derive(Clone)]
pub struct Summarizer {
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn ModelProvider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        let request = ProviderRequest::single_turn(SUMMARY_INSTRUCTION, text)
            .with_settings(self.settings.clone());
        let response = self.provider.generate_text(&request).await?;
        Ok(response.text)
    }
}

/// Looks up counselor responses matching the keywords the model extracted
/// and returns their summary as `{"results": <summary>}`.
///
/// When no record matches, the result is `{"results": null}` and neither
/// the cache nor the summarizer is touched. Accesses are recorded only
/// once the summary succeeds.
pub struct FetchAdviceTool {
    corpus: Arc<CorpusStore>,
    summarizer: Summarizer,
    cache: Option<AccessCache>,
    parameters: ToolParameters,
}

impl FetchAdviceTool {
    pub fn new(corpus: Arc<CorpusStore>, summarizer: Summarizer) -> Self {
        Self {
            corpus,
            summarizer,
            cache: None,
            parameters: ToolParameters::object()
                .string_array(
                    "keywords",
                    "A list of keywords to be used for developing advice.",
                    "A keyword to be used for developing advice.",
                    true,
                )
                .build(),
        }
    }

    /// Record every successful retrieval in `cache`.
    pub fn with_access_cache(mut self, cache: AccessCache) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn record_access(&self, indices: Vec<usize>) {
        let Some(cache) = &self.cache else {
            return;
        };
        let result = match IndexList::new(indices) {
            Ok(list) => cache.record(&self.corpus, &list).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to write access cache");
        }
    }
}

#[async_trait]
impl Tool for FetchAdviceTool {
    fn name(&self) -> &str {
        FETCH_ADVICE
    }

    fn description(&self) -> &str {
        FETCH_ADVICE_DESCRIPTION
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<Value> {
        validate_arguments(args.raw(), &self.parameters.schema)?;
        let keywords = KeywordSet::from_values(args.get_array("keywords")?)?;

        let hits = self.corpus.search(&keywords);
        debug!(keywords = keywords.len(), matches = hits.len(), "fetchAdvice search");
        if hits.is_empty() {
            return Ok(json!({ "results": Value::Null }));
        }

        let snips = hits
            .iter()
            .map(|hit| hit.record.response.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let indices: Vec<usize> = hits.iter().map(|hit| hit.index).collect();

        let summary = self.summarizer.summarize(&snips).await?;
        self.record_access(indices).await;
        Ok(json!({ "results": summary }))
    }
}
