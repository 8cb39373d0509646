use anyhow::Result;
use tracing::info;

use crate::state::AppState;

/// Synthesize a new event and describe what was produced.
pub async fn create(state: &AppState, number: u32) -> Result<String> {
    info!(number, "synthesis requested");
    let (artifact, persisted) = state.synthesizer.synthesize(number, &state.samples).await?;

    let label = format!("{}{}", state.router.event_prefix().to_uppercase(), number);
    let mut out = format!("XAI Feedback:\n{}\n", artifact.feedback.raw);
    if artifact.revised {
        out.push_str(&format!(
            "\nScore {} was below the bar; the problem was revised once based on the feedback.\n",
            artifact.feedback.score
        ));
    }
    out.push_str(&format!(
        "\n{} created and saved in '{}'.",
        label,
        persisted.dir.display()
    ));
    Ok(out)
}

/// Reply for a generation request naming an event the corpus already has.
pub fn already_exists(state: &AppState, number: u32) -> String {
    format!(
        "{}{} already exists.",
        state.router.event_prefix().to_uppercase(),
        number
    )
}
