//! CLI definition for the counselor binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::classifier::IntentMatching;
use crate::config::AgentSettings;

/// Counselor chat agent
#[derive(Parser, Debug)]
#[command(name = "counselor", version, about = "Intent-routed counseling chat agent")]
pub struct Cli {
    /// Log output format (logs go to stderr; filter with RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Config file (defaults to counselor.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive counseling session
    Chat(ChatArgs),
    /// Search the corpus by keywords without contacting the model
    Search(SearchArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug, Default)]
pub struct ChatArgs {
    /// Model to use (format: provider:model, e.g. google:gemini-2.0-flash-001)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Corpus location: file path, http(s) URL or hf://datasets/<owner>/<name>/<file>
    #[arg(long)]
    pub corpus: Option<String>,

    /// Directory for the daily access cache
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Do not record retrievals in the access cache
    #[arg(long)]
    pub no_cache: bool,

    /// Maximum history turns sent to the model (0 = unlimited)
    #[arg(long)]
    pub context_window: Option<usize>,

    /// How the classifier reply is turned into a label
    #[arg(long, value_parser = parse_matching)]
    pub intent_matching: Option<IntentMatching>,
}

impl ChatArgs {
    /// Overlay the flags that were given onto `settings`.
    pub fn apply(&self, settings: &mut AgentSettings) {
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(corpus) = &self.corpus {
            settings.corpus = corpus.clone();
        }
        if let Some(dir) = &self.cache_dir {
            settings.cache_dir = dir.clone();
        }
        if self.no_cache {
            settings.cache_enabled = false;
        }
        if let Some(window) = self.context_window {
            settings.context_window = window;
        }
        if let Some(matching) = self.intent_matching {
            settings.intent_matching = matching;
        }
    }
}

/// Arguments for the `search` subcommand.
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Keywords; a record matches when its context or response contains any of them
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Corpus location (overrides config)
    #[arg(long)]
    pub corpus: Option<String>,

    /// Maximum number of matches printed
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

fn parse_matching(raw: &str) -> Result<IntentMatching, String> {
    raw.parse()
        .map_err(|_| format!("expected 'strict' or 'substring', got '{raw}'"))
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
