pub mod prompts;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::corpus::types::{EventKey, Rank};
use crate::corpus::CorpusIndex;
use crate::llm::CompletionGateway;

/// Event numbers above this are treated as not mentioned at all.
const MAX_EVENT_NUMBER: u32 = 99;

/// What to do with one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Synthesize a brand-new event with this number.
    Generate(u32),
    /// Generation was requested for an event the corpus already has.
    AlreadyExists(u32),
    /// Answer from one event, optionally one rank of it.
    AnswerScoped(EventKey, Option<Rank>),
    /// Answer from excerpts of the whole corpus.
    AnswerGlobal,
}

/// Parses user input into a [`RoutingDecision`] and builds the matching prompt.
pub struct QueryRouter {
    event_prefix: String,
    generate_re: Regex,
    event_re: Regex,
    rank_re: Regex,
}

impl QueryRouter {
    pub fn new(event_prefix: &str) -> Result<Self> {
        let prefix = regex::escape(&event_prefix.to_lowercase());
        Ok(Self {
            event_prefix: event_prefix.to_lowercase(),
            generate_re: Regex::new(&format!(r"(?:create|generate|make).*?{}\s*(\d+)", prefix))
                .context("invalid generation pattern")?,
            event_re: Regex::new(&format!(r"{}\s*(\d+)", prefix))
                .context("invalid event pattern")?,
            rank_re: Regex::new(r"(1st|first|2nd|second|3rd|third)")
                .context("invalid rank pattern")?,
        })
    }

    pub fn event_prefix(&self) -> &str {
        &self.event_prefix
    }

    pub fn route(&self, input: &str, index: &CorpusIndex) -> RoutingDecision {
        let lowered = input.to_lowercase();

        if let Some(number) = capture_number(&self.generate_re, &lowered) {
            let key = EventKey::from_number(&self.event_prefix, number);
            return if index.contains(&key) {
                RoutingDecision::AlreadyExists(number)
            } else {
                RoutingDecision::Generate(number)
            };
        }

        let Some(number) =
            capture_number(&self.event_re, &lowered).filter(|n| *n <= MAX_EVENT_NUMBER)
        else {
            return RoutingDecision::AnswerGlobal;
        };

        let rank = self
            .rank_re
            .captures(&lowered)
            .and_then(|c| c.get(1))
            .and_then(|m| Rank::from_ordinal(m.as_str()));

        RoutingDecision::AnswerScoped(EventKey::from_number(&self.event_prefix, number), rank)
    }

    /// Prompt for an answering decision. `None` for decisions that never reach the model.
    pub fn prompt_for(
        &self,
        decision: &RoutingDecision,
        index: &CorpusIndex,
        question: &str,
    ) -> Option<String> {
        match decision {
            RoutingDecision::Generate(_) | RoutingDecision::AlreadyExists(_) => None,
            RoutingDecision::AnswerScoped(key, rank) => Some(match (index.get(key), rank) {
                (None, _) => prompts::missing_event(key),
                (Some(placements), Some(rank)) => match placements.get(rank) {
                    Some(content) => prompts::ranked_document(content, question),
                    None => prompts::missing_rank(*rank, key),
                },
                (Some(placements), None) => prompts::event_overview(key, placements, question),
            }),
            RoutingDecision::AnswerGlobal => {
                Some(prompts::corpus_wide(index, &self.event_prefix, question))
            }
        }
    }

    /// Build the prompt for an answering decision and return the raw completion.
    pub async fn answer(
        &self,
        decision: &RoutingDecision,
        index: &CorpusIndex,
        question: &str,
        gateway: &dyn CompletionGateway,
    ) -> Result<String> {
        let prompt = self
            .prompt_for(decision, index, question)
            .with_context(|| format!("{:?} is not an answering decision", decision))?;
        debug!(decision = ?decision, prompt_len = prompt.len(), "answering");
        let reply = gateway.ask(&prompt).await?;
        info!(decision = ?decision, answer_len = reply.len(), "answer ready");
        Ok(reply)
    }
}

/// First capture group parsed as a number; overflow counts as no match.
fn capture_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::types::PlacementMap;
    use crate::llm::testing::ScriptedGateway;

    fn index() -> CorpusIndex {
        let gtoc5: PlacementMap = [
            (Rank::First, "JPL won with a 18-asteroid tour".to_string()),
            (Rank::Second, "Moscow State second place".to_string()),
        ]
        .into_iter()
        .collect();
        CorpusIndex::from_entries([(EventKey::normalize("gtoc5"), gtoc5)])
    }

    fn router() -> QueryRouter {
        QueryRouter::new("gtoc").unwrap()
    }

    #[test]
    fn test_generate_new_event() {
        assert_eq!(
            router().route("Please create GTOC 13 for me", &index()),
            RoutingDecision::Generate(13)
        );
        assert_eq!(
            router().route("make a new gtoc14", &index()),
            RoutingDecision::Generate(14)
        );
    }

    #[test]
    fn test_generate_existing_event_is_deduplicated() {
        let decision = router().route("create gtoc5", &index());
        assert_eq!(decision, RoutingDecision::AlreadyExists(5));
        assert!(router().prompt_for(&decision, &index(), "create gtoc5").is_none());
    }

    #[test]
    fn test_scoped_with_rank() {
        assert_eq!(
            router().route("Who came second in GTOC5?", &index()),
            RoutingDecision::AnswerScoped(EventKey::normalize("gtoc5"), Some(Rank::Second))
        );
        assert_eq!(
            router().route("gtoc 5 1st place approach", &index()),
            RoutingDecision::AnswerScoped(EventKey::normalize("gtoc5"), Some(Rank::First))
        );
    }

    #[test]
    fn test_scoped_without_rank() {
        assert_eq!(
            router().route("tell me about gtoc5", &index()),
            RoutingDecision::AnswerScoped(EventKey::normalize("gtoc5"), None)
        );
    }

    #[test]
    fn test_event_number_cap() {
        assert_eq!(router().route("what about gtoc100", &index()), RoutingDecision::AnswerGlobal);
        assert_eq!(
            router().route("gtoc 99999999999999 third", &index()),
            RoutingDecision::AnswerGlobal
        );
        assert_eq!(
            router().route("what about gtoc99", &index()),
            RoutingDecision::AnswerScoped(EventKey::normalize("gtoc99"), None)
        );
    }

    #[test]
    fn test_global_when_no_event_mentioned() {
        assert_eq!(
            router().route("What do winners usually do?", &index()),
            RoutingDecision::AnswerGlobal
        );
    }

    #[test]
    fn test_custom_prefix() {
        let router = QueryRouter::new("Event").unwrap();
        assert_eq!(
            router.route("generate event 3", &CorpusIndex::default()),
            RoutingDecision::Generate(3)
        );
    }

    #[test]
    fn test_prompt_variants() {
        let r = router();
        let idx = index();
        let key = EventKey::normalize("gtoc5");

        let ranked = r
            .prompt_for(&RoutingDecision::AnswerScoped(key.clone(), Some(Rank::First)), &idx, "q")
            .unwrap();
        assert!(ranked.starts_with("Based only on this content:\n\nJPL won"));

        let missing_rank = r
            .prompt_for(&RoutingDecision::AnswerScoped(key.clone(), Some(Rank::Third)), &idx, "q")
            .unwrap();
        assert_eq!(missing_rank, "No info for 3rd in GTOC5.");

        let missing_event = r
            .prompt_for(
                &RoutingDecision::AnswerScoped(EventKey::normalize("gtoc8"), None),
                &idx,
                "q",
            )
            .unwrap();
        assert_eq!(missing_event, "GTOC8 not found.");

        let global = r.prompt_for(&RoutingDecision::AnswerGlobal, &idx, "q").unwrap();
        assert!(global.starts_with("Based on all known GTOCs:"));
    }

    #[tokio::test]
    async fn test_answer_returns_completion_unmodified() {
        let gw = ScriptedGateway::new(["They used a multi-gravity-assist tour."]);
        let r = router();
        let idx = index();
        let decision = r.route("How did the 1st place team in gtoc5 do it?", &idx);
        let reply = r
            .answer(&decision, &idx, "How did the 1st place team in gtoc5 do it?", &gw)
            .await
            .unwrap();
        assert_eq!(reply, "They used a multi-gravity-assist tour.");
        assert_eq!(gw.calls(), 1);
        assert!(gw.prompts()[0].contains("JPL won"));
    }

    #[tokio::test]
    async fn test_lookup_miss_still_calls_model_with_notice() {
        let gw = ScriptedGateway::new(["I have no data on that."]);
        let r = router();
        let idx = index();
        let decision = r.route("gtoc5 third place?", &idx);
        r.answer(&decision, &idx, "gtoc5 third place?", &gw).await.unwrap();
        assert_eq!(gw.prompts(), vec!["No info for 3rd in GTOC5.".to_string()]);
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let gw = ScriptedGateway::failing("connection refused");
        let r = router();
        let idx = index();
        let result = r.answer(&RoutingDecision::AnswerGlobal, &idx, "q", &gw).await;
        assert!(result.is_err());
    }
}
