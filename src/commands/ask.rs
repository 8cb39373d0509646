use anyhow::Result;
use tracing::info;

use crate::query::RoutingDecision;
use crate::state::AppState;

/// Answer a question from the corpus, scoped by the routing decision.
pub async fn ask(state: &AppState, decision: &RoutingDecision, question: &str) -> Result<String> {
    info!(question, decision = ?decision, "question received");
    state
        .router
        .answer(decision, &state.index, question, state.gateway.as_ref())
        .await
}
