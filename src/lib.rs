//! Counselor: an intent-routed counseling chat agent.
//!
//! Every user turn is classified as casual conversation (`None`), a request
//! for help (`Help`) or an out-of-scope request (`Fallback`). Help turns are
//! augmented with counselor responses retrieved from a dialogue corpus by
//! keyword before the model replies.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use counselor::prelude::*;
//!
//! # async fn example() -> counselor::error::Result<()> {
//! let config = CounselConfig::load(None)?;
//! let corpus = Arc::new(CorpusStore::load(&config.settings().corpus.parse()?).await?);
//! let model: LanguageModel = config.settings().model.parse()?;
//! let provider = counselor::provider::create_provider(&model, &config)?;
//!
//! let summarizer = Summarizer::new(provider.clone(), GenerationSettings::default());
//! let tool = Arc::new(FetchAdviceTool::new(corpus, summarizer));
//! let mut agent = Orchestrator::new(provider, tool, config.settings());
//!
//! if let TurnOutcome::Replied { reply, .. } = agent.handle_input("hi there").await? {
//!     println!("{reply}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod models;
pub mod prelude;
pub mod prompts;
pub mod provider;
pub mod strategy;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
