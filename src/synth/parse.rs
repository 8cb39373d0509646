use std::sync::OnceLock;

use regex::Regex;

/// Token that separates the narrative from the data table in a draft.
pub const TABLE_MARKER: &str = "Target Name";
/// Header used when a draft contains no table.
pub const TABLE_HEADER: &str = "Target Name,Distance (AU),Delta-V (km/s),Time Window (days)";
/// Problem text used when a draft contains no table.
pub const PLACEHOLDER_PROBLEM: &str = "No problem generated";

/// Result of splitting a completion on the first [`TABLE_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    Found { problem: String, table: String },
    MarkerAbsent,
}

impl Split {
    pub fn parse(completion: &str) -> Self {
        match completion.split_once(TABLE_MARKER) {
            Some((before, after)) => Split::Found {
                problem: before.trim().to_string(),
                table: format!("{}{}", TABLE_MARKER, after.trim()),
            },
            None => Split::MarkerAbsent,
        }
    }
}

/// Parsed critique of a synthesized problem statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackResult {
    /// 0–100; 0 when the critique carries no readable score.
    pub score: u32,
    pub explanation: String,
    pub suggestions: String,
    /// Critique text exactly as the model returned it.
    pub raw: String,
}

impl FeedbackResult {
    pub fn parse(raw: &str) -> Self {
        static SCORE_RE: OnceLock<Regex> = OnceLock::new();
        let score_re = SCORE_RE
            .get_or_init(|| Regex::new(r"Score:\s*(\d+)").expect("score pattern is valid"));

        let score = score_re
            .captures(raw)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map(|s| s.min(100))
            .unwrap_or(0);

        Self {
            score,
            explanation: section(raw, "Explanation:", Some("Suggestions:")),
            suggestions: section(raw, "Suggestions:", None),
            raw: raw.to_string(),
        }
    }
}

/// Text after `label`, up to `until` if it follows.
fn section(raw: &str, label: &str, until: Option<&str>) -> String {
    let Some((_, rest)) = raw.split_once(label) else {
        return String::new();
    };
    let body = match until.and_then(|u| rest.split_once(u)) {
        Some((body, _)) => body,
        None => rest,
    };
    body.trim().to_string()
}
