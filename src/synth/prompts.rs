/// Draft request: narrative problem plus a CSV table, in the style of past problems.
pub fn draft(label: &str, style_sample: &str) -> String {
    format!(
        "Based on the style and content of previous {label} problem statements below, create a new problem \
         for a hypothetical {label}. Include a mission description and objectives.\n\n\
         Then generate fake mission data in CSV format (columns: Target Name, Distance (AU), \
         Delta-V (km/s), Time Window (days)).\n\n\
         PAST PROBLEMS:\n{style_sample}",
    )
}

/// Critique request with the fixed three-field answer format.
pub fn critique(competition: &str, problem: &str, style_sample: &str) -> String {
    format!(
        "You are an expert judge of {competition} problem statements.\n\n\
         Evaluate the following GENERATED PROBLEM compared to PAST PROBLEMS:\n\
         - Score it 0 to 100 (alignment with past {competition}s).\n\
         - Explain why you gave that score.\n\
         - Suggest improvements.\n\n\
         PAST PROBLEMS:\n{style_sample}\n\n\
         GENERATED PROBLEM:\n{problem}\n\n\
         Your response format:\n\
         Score: (number)\n\
         Explanation: (text)\n\
         Suggestions: (text)\n",
    )
}

/// Revision request bundling the failing draft, the sample and the critique.
pub fn revise(competition: &str, score: u32, problem: &str, style_sample: &str, critique: &str) -> String {
    format!(
        "The following {competition} problem scored poorly ({score}). Please revise it to better match \
         the style and depth of real {competition}s.\n\n\
         Problem to fix:\n{problem}\n\n\
         Real examples:\n{style_sample}\n\n\
         Suggestions:\n{critique}",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_names_columns_and_sample() {
        let p = draft("GTOC13", "sample one\n\nsample two");
        assert!(p.contains("hypothetical GTOC13"));
        assert!(p.contains("Target Name, Distance (AU), Delta-V (km/s), Time Window (days)"));
        assert!(p.ends_with("PAST PROBLEMS:\nsample one\n\nsample two"));
    }

    #[test]
    fn test_critique_asks_for_score_label() {
        let p = critique("GTOC", "new problem", "old problems");
        assert!(p.contains("GENERATED PROBLEM:\nnew problem"));
        assert!(p.contains("Score: (number)"));
    }

    #[test]
    fn test_revise_carries_score_and_critique() {
        let p = revise("GTOC", 42, "draft", "examples", "Score: 42\nSuggestions: more");
        assert!(p.contains("scored poorly (42)"));
        assert!(p.ends_with("Suggestions:\nScore: 42\nSuggestions: more"));
    }
}
