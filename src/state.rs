use std::path::PathBuf;
use std::sync::Arc;

use crate::corpus::types::ProblemSample;
use crate::corpus::CorpusIndex;
use crate::llm::CompletionGateway;
use crate::query::QueryRouter;
use crate::synth::Synthesizer;

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub corpus_dir: PathBuf,
    pub event_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let corpus_dir = dotenv::var("CORPUS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("Gtoc information"));
        let event_prefix = dotenv::var("EVENT_PREFIX")
            .ok()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "gtoc".to_string());
        Self {
            corpus_dir,
            event_prefix,
        }
    }
}

/// Tunables for the draft/critique/revise loop.
#[derive(Debug, Clone, Copy)]
pub struct SynthConfig {
    /// Critique scores below this trigger the single revision pass.
    pub pass_score: u32,
    /// How many problem snippets form the style sample.
    pub style_sample_size: usize,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            pass_score: 70,
            style_sample_size: 5,
        }
    }
}

/// Everything the session needs. The index and samples never change after startup.
pub struct AppState {
    pub index: Arc<CorpusIndex>,
    pub samples: Arc<ProblemSample>,
    pub gateway: Arc<dyn CompletionGateway>,
    pub router: QueryRouter,
    pub synthesizer: Synthesizer,
}
