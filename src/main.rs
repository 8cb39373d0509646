mod commands;
mod corpus;
mod llm;
mod query;
mod state;
mod synth;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn, Level};

use corpus::extract::PdfExtractor;
use corpus::CorpusIndex;
use llm::LlmClient;
use query::QueryRouter;
use state::{AppConfig, AppState, SynthConfig};
use synth::Synthesizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the chat; logs go to stderr
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let config = AppConfig::from_env();
    info!(corpus = ?config.corpus_dir, prefix = %config.event_prefix, "configuration loaded");

    // Extraction is blocking work
    let corpus_dir = config.corpus_dir.clone();
    let (index, samples) = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let extractor = PdfExtractor;
        let index = CorpusIndex::build(&corpus_dir, &extractor)?;
        let samples = corpus::collect_problem_samples(&corpus_dir, &extractor)?;
        Ok((index, samples))
    })
    .await
    .context("spawn_blocking join failed")??;
    if index.is_empty() {
        warn!(corpus = ?config.corpus_dir, "no events indexed, answers will have no context");
    }
    info!(fingerprint = %index.fingerprint(), "corpus ready");

    let llm_client = Arc::new(LlmClient::from_env()?);
    info!(model = llm_client.model(), "LLM client initialized");

    let router = QueryRouter::new(&config.event_prefix)?;
    let synthesizer = Synthesizer::new(
        llm_client.clone(),
        &config.corpus_dir,
        &config.event_prefix,
        SynthConfig::default(),
    );

    let app_state = AppState {
        index: Arc::new(index),
        samples: Arc::new(samples),
        gateway: llm_client,
        router,
        synthesizer,
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    commands::run_session(&app_state, stdin, tokio::io::stdout()).await
}
