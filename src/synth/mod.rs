pub mod parse;
pub mod prompts;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::llm::CompletionGateway;
use crate::state::SynthConfig;

use parse::{FeedbackResult, Split, PLACEHOLDER_PROBLEM, TABLE_HEADER};

/// A synthesized event: problem statement, data table and the critique it received.
#[derive(Debug, Clone)]
pub struct SynthesizedArtifact {
    pub problem_text: String,
    pub structured_data: String,
    pub feedback: FeedbackResult,
    /// Whether the low-score revision pass ran.
    pub revised: bool,
}

impl SynthesizedArtifact {
    fn from_draft(completion: &str, feedback: FeedbackResult) -> Self {
        let (problem_text, structured_data) = match Split::parse(completion) {
            Split::Found { problem, table } => (problem, table),
            Split::MarkerAbsent => {
                warn!("draft has no data table, using placeholder");
                (PLACEHOLDER_PROBLEM.to_string(), TABLE_HEADER.to_string())
            }
        };
        Self {
            problem_text,
            structured_data,
            feedback,
            revised: false,
        }
    }

    /// Take the revised problem and table if the revision has a table; keep the draft otherwise.
    fn apply_revision(&mut self, completion: &str) {
        match Split::parse(completion) {
            Split::Found { problem, table } => {
                self.problem_text = problem;
                self.structured_data = table;
            }
            Split::MarkerAbsent => {
                warn!("revision has no data table, keeping original draft");
            }
        }
        self.revised = true;
    }
}

/// Where a synthesized event was written.
#[derive(Debug, Clone)]
pub struct PersistedEvent {
    pub dir: PathBuf,
    pub problem_path: PathBuf,
    pub data_path: PathBuf,
    pub feedback_path: PathBuf,
}

/// Draft → critique → (one) revision → persist.
pub struct Synthesizer {
    gateway: Arc<dyn CompletionGateway>,
    output_root: PathBuf,
    event_prefix: String,
    config: SynthConfig,
}

impl Synthesizer {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        output_root: impl Into<PathBuf>,
        event_prefix: &str,
        config: SynthConfig,
    ) -> Self {
        Self {
            gateway,
            output_root: output_root.into(),
            event_prefix: event_prefix.to_lowercase(),
            config,
        }
    }

    /// Synthesize event `number` and write it under the output root.
    ///
    /// Gateway and filesystem errors abort the synthesis; nothing is written
    /// unless every model call succeeded.
    pub async fn synthesize(
        &self,
        number: u32,
        samples: &[String],
    ) -> Result<(SynthesizedArtifact, PersistedEvent)> {
        let competition = self.event_prefix.to_uppercase();
        let label = format!("{}{}", competition, number);
        let style_sample = samples
            .iter()
            .take(self.config.style_sample_size)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n");

        info!(event = %label, samples = samples.len().min(self.config.style_sample_size), "drafting");
        let draft = self
            .gateway
            .ask(&prompts::draft(&label, &style_sample))
            .await
            .context("draft request failed")?;
        debug!(draft_len = draft.len(), "draft received");

        let mut artifact = SynthesizedArtifact::from_draft(&draft, FeedbackResult::parse(""));

        let critique = self
            .gateway
            .ask(&prompts::critique(
                &competition,
                &artifact.problem_text,
                &style_sample,
            ))
            .await
            .context("critique request failed")?;
        artifact.feedback = FeedbackResult::parse(&critique);
        info!(event = %label, score = artifact.feedback.score, "critique received");
        debug!("critique:\n{}", artifact.feedback.raw);

        if artifact.feedback.score < self.config.pass_score {
            warn!(
                event = %label,
                score = artifact.feedback.score,
                threshold = self.config.pass_score,
                "score too low, requesting one revision"
            );
            let revision = self
                .gateway
                .ask(&prompts::revise(
                    &competition,
                    artifact.feedback.score,
                    &artifact.problem_text,
                    &style_sample,
                    &artifact.feedback.raw,
                ))
                .await
                .context("revision request failed")?;
            artifact.apply_revision(&revision);
            info!(event = %label, "problem revised from critique");
        }

        let persisted = self.persist(number, &artifact).await?;
        info!(event = %label, dir = ?persisted.dir, "synthesized event saved");
        Ok((artifact, persisted))
    }

    async fn persist(&self, number: u32, artifact: &SynthesizedArtifact) -> Result<PersistedEvent> {
        let upper = format!("{}{}", self.event_prefix.to_uppercase(), number);
        let dir = self
            .output_root
            .join(format!("{}{}", capitalize(&self.event_prefix), number));
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let persisted = PersistedEvent {
            problem_path: dir.join(format!("{}-PROBLEM.txt", upper)),
            data_path: dir.join(format!("{}-data.csv", upper)),
            feedback_path: dir.join(format!("{}-XAI-Feedback.txt", upper)),
            dir,
        };
        write(&persisted.problem_path, &artifact.problem_text).await?;
        write(&persisted.data_path, &artifact.structured_data).await?;
        write(&persisted.feedback_path, &artifact.feedback.raw).await?;
        Ok(persisted)
    }
}

async fn write(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
