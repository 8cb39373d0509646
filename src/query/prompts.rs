use crate::corpus::excerpt;
use crate::corpus::types::{EventKey, PlacementMap, Rank};
use crate::corpus::CorpusIndex;

/// Characters of a single ranked document shown for a rank-specific question.
pub const RANKED_DOC_CHARS: usize = 2000;
/// Characters per rank when a question names the event but no rank.
pub const PER_RANK_CHARS: usize = 800;
/// Characters per (event, rank) entry in the corpus-wide context.
pub const GLOBAL_ENTRY_CHARS: usize = 500;
/// Hard cap on the corpus-wide context, whatever the corpus size.
pub const GLOBAL_CONTEXT_CHARS: usize = 3000;

pub fn ranked_document(content: &str, question: &str) -> String {
    format!(
        "Based only on this content:\n\n{}\n\nAnswer this:\n{}",
        excerpt(content, RANKED_DOC_CHARS),
        question
    )
}

pub fn missing_rank(rank: Rank, key: &EventKey) -> String {
    format!("No info for {} in {}.", rank, key.as_str().to_uppercase())
}

pub fn event_overview(key: &EventKey, placements: &PlacementMap, question: &str) -> String {
    let combined = placements
        .iter()
        .map(|(rank, text)| {
            format!(
                "{} PLACE:\n{}",
                rank.key().to_uppercase(),
                excerpt(text, PER_RANK_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Here's info for {}:\n{}\n\nUser asked: {}",
        key.as_str().to_uppercase(),
        combined,
        question
    )
}

pub fn missing_event(key: &EventKey) -> String {
    format!("{} not found.", key.as_str().to_uppercase())
}

/// Excerpts of every indexed document, cut to [`GLOBAL_CONTEXT_CHARS`].
pub fn global_context(index: &CorpusIndex) -> String {
    let mut all_text = String::new();
    for (key, placements) in index.iter() {
        for (rank, text) in placements {
            all_text.push_str(&format!(
                "{} {}:\n{}\n\n",
                key.as_str().to_uppercase(),
                rank.key().to_uppercase(),
                excerpt(text, GLOBAL_ENTRY_CHARS)
            ));
        }
    }
    excerpt(&all_text, GLOBAL_CONTEXT_CHARS).to_string()
}

pub fn corpus_wide(index: &CorpusIndex, event_prefix: &str, question: &str) -> String {
    format!(
        "Based on all known {}s:\n\n{}\n\nUser's question: {}",
        event_prefix.to_uppercase(),
        global_context(index),
        question
    )
}
