//! Counselor CLI binary entry point.

use std::sync::Arc;

use counselor::agent::{run_repl, Orchestrator};
use counselor::cache::AccessCache;
use counselor::cli::{ChatArgs, Cli, Commands, LogFormat, SearchArgs};
use counselor::config::CounselConfig;
use counselor::corpus::{CorpusSource, CorpusStore, KeywordSet};
use counselor::error::Result;
use counselor::models::LanguageModel;
use counselor::tools::{FetchAdviceTool, Summarizer};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("counselor=info"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.log_format);

    let result = match CounselConfig::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Chat(args) => handle_chat(config, args).await,
            Commands::Search(args) => handle_search(config, args).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(hint) = e.recovery_suggestion().hint() {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(1);
    }
}

async fn handle_chat(mut config: CounselConfig, args: ChatArgs) -> Result<()> {
    args.apply(config.settings_mut());
    let settings = config.settings().clone();

    let model: LanguageModel = settings.model.parse()?;
    let provider = counselor::provider::create_provider(&model, &config)?;

    let source: CorpusSource = settings.corpus.parse()?;
    let corpus = Arc::new(CorpusStore::load(&source).await?);

    let summarizer = Summarizer::new(provider.clone(), settings.generation.clone());
    let mut tool = FetchAdviceTool::new(corpus, summarizer);
    if settings.cache_enabled {
        tool = tool.with_access_cache(AccessCache::new(settings.cache_dir.clone()));
    }

    let mut orchestrator = Orchestrator::new(provider, Arc::new(tool), &settings);
    run_repl(
        &mut orchestrator,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

async fn handle_search(config: CounselConfig, args: SearchArgs) -> Result<()> {
    let location = args
        .corpus
        .unwrap_or_else(|| config.settings().corpus.clone());
    let source: CorpusSource = location.parse()?;
    let corpus = CorpusStore::load(&source).await?;
    let keywords = KeywordSet::new(args.keywords)?;

    let hits = corpus.search(&keywords);
    println!("{} matching record(s)", hits.len());
    for hit in hits.iter().take(args.limit) {
        println!("[{}] {}", hit.index, hit.record.context.trim());
        println!("    -> {}", hit.record.response.trim());
    }
    Ok(())
}
