pub mod extract;
pub mod types;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use extract::DocumentExtractor;
use types::{EventKey, PlacementMap, ProblemSample, Rank};

/// Recognized source document extension.
const DOC_EXTENSION: &str = ".pdf";
/// Filename marker for problem-statement documents.
const PROBLEM_MARKER: &str = "-problem";
/// Character budget for one style-sample snippet.
const SAMPLE_CHARS: usize = 1000;

/// Event → rank → document text. Built once, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusIndex {
    events: BTreeMap<EventKey, PlacementMap>,
}

impl CorpusIndex {
    /// Walk `root/<event>/<rank>/` and extract the first document per rank.
    pub fn build(root: &Path, extractor: &dyn DocumentExtractor) -> Result<Self> {
        let mut events = BTreeMap::new();

        for event_dir in subdirectories(root)? {
            let mut placements = PlacementMap::new();

            for rank_dir in subdirectories(&event_dir)? {
                let rank = Rank::classify(&file_name(&rank_dir));
                if placements.contains_key(&rank) {
                    debug!(folder = ?rank_dir, %rank, "rank already filled, skipping folder");
                    continue;
                }
                let Some(doc) = first_document(&rank_dir)? else {
                    continue;
                };
                let text = match extractor.extract(&doc) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "extraction failed, storing error text");
                        extract::error_notice(&e)
                    }
                };
                placements.insert(rank, text);
            }

            if placements.is_empty() {
                debug!(folder = ?event_dir, "no ranked documents, event omitted");
                continue;
            }
            let key = EventKey::normalize(&file_name(&event_dir));
            // Two folders normalizing to one key: first wins, like ranks.
            events.entry(key).or_insert(placements);
        }

        let index = Self { events };
        info!(
            events = index.len(),
            documents = index.document_count(),
            root = ?root,
            "corpus index built"
        );
        Ok(index)
    }

    pub fn get(&self, key: &EventKey) -> Option<&PlacementMap> {
        self.events.get(key)
    }

    pub fn contains(&self, key: &EventKey) -> bool {
        self.events.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EventKey, &PlacementMap)> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.events.values().map(|p| p.len()).sum()
    }

    /// blake3 digest over keys, ranks and texts in iteration order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (key, placements) in &self.events {
            hasher.update(key.as_str().as_bytes());
            hasher.update(&[0]);
            for (rank, text) in placements {
                hasher.update(rank.key().as_bytes());
                hasher.update(&[0]);
                hasher.update(&(text.len() as u64).to_le_bytes());
                hasher.update(text.as_bytes());
            }
            hasher.update(&[0xff]);
        }
        hasher.finalize().to_hex().to_string()
    }

    #[cfg(test)]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (EventKey, PlacementMap)>,
    {
        Self {
            events: entries.into_iter().filter(|(_, p)| !p.is_empty()).collect(),
        }
    }
}

/// Problem-statement snippets from files sitting directly in each event folder.
pub fn collect_problem_samples(
    root: &Path,
    extractor: &dyn DocumentExtractor,
) -> Result<ProblemSample> {
    let mut samples = Vec::new();

    for event_dir in subdirectories(root)? {
        for file in files(&event_dir)? {
            let name = file_name(&file).to_lowercase();
            if !(name.ends_with(DOC_EXTENSION) && name.contains(PROBLEM_MARKER)) {
                continue;
            }
            let text = extractor.extract_or_notice(&file);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let flat = text.replace('\n', " ");
            samples.push(excerpt(&flat, SAMPLE_CHARS).to_string());
        }
    }

    info!(count = samples.len(), "problem samples collected");
    Ok(samples)
}

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Directory entries sorted by name. Raw `read_dir` order is platform
/// dependent; sorting makes index contents and sample order reproducible.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| match entry {
            Ok(e) => Some(e.path()),
            Err(e) => {
                warn!("Error reading entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?.into_iter().filter(|p| p.is_dir()).collect())
}

fn files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?.into_iter().filter(|p| p.is_file()).collect())
}

/// First file with the document extension; further matches are ignored.
fn first_document(dir: &Path) -> Result<Option<PathBuf>> {
    Ok(files(dir)?
        .into_iter()
        .find(|p| file_name(p).to_lowercase().ends_with(DOC_EXTENSION)))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::extract::testing::PlainTextExtractor;
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "GTOC5/Winner-1st-Place/a-report.pdf", "gold team report");
        write(root, "GTOC5/Winner-1st-Place/b-report.pdf", "ignored second file");
        write(root, "GTOC5/2ND runner up/report.pdf", "silver team report");
        write(root, "GTOC5/bronze-3rd/report.pdf", "bronze team report");
        write(root, "GTOC5/Honorable/report.pdf", "honorable mention");
        write(root, "GTOC5/GTOC5-Problem.pdf", "Asteroid\nrendezvous\nchallenge");
        write(root, "GTOC 7/1st/notes.txt", "not a document");
        write(root, "GTOC 7/1st/corrupt.pdf", "unreadable");
        write(root, "GTOC9/empty-rank/readme.md", "nothing here");
        write(root, "stray.pdf", "top-level file");
        dir
    }

    #[test]
    fn test_rank_classification() {
        assert_eq!(Rank::classify("Winner-1st-Place"), Rank::First);
        assert_eq!(Rank::classify("2ND runner up"), Rank::Second);
        assert_eq!(Rank::classify("bronze-3rd"), Rank::Third);
        assert_eq!(Rank::classify("Honorable"), Rank::Other);
    }

    #[test]
    fn test_build_index() {
        let corpus = sample_corpus();
        let index = CorpusIndex::build(corpus.path(), &PlainTextExtractor).unwrap();

        assert_eq!(index.len(), 2);
        let gtoc5 = index.get(&EventKey::normalize("gtoc5")).unwrap();
        assert_eq!(gtoc5[&Rank::First], "gold team report");
        assert_eq!(gtoc5[&Rank::Second], "silver team report");
        assert_eq!(gtoc5[&Rank::Third], "bronze team report");
        assert_eq!(gtoc5[&Rank::Other], "honorable mention");

        // Event with no ranked documents is dropped entirely.
        assert!(!index.contains(&EventKey::normalize("gtoc9")));
    }

    #[test]
    fn test_extraction_failure_is_stored_as_text() {
        let corpus = sample_corpus();
        let index = CorpusIndex::build(corpus.path(), &PlainTextExtractor).unwrap();
        let gtoc7 = index.get(&EventKey::normalize("gtoc7")).unwrap();
        assert!(gtoc7[&Rank::First].starts_with("Error reading PDF:"));
    }

    #[test]
    fn test_first_folder_wins_within_rank() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "gtoc3/a-misc/report.pdf", "first other");
        write(dir.path(), "gtoc3/b-misc/report.pdf", "second other");
        let index = CorpusIndex::build(dir.path(), &PlainTextExtractor).unwrap();
        let gtoc3 = index.get(&EventKey::normalize("gtoc3")).unwrap();
        assert_eq!(gtoc3.len(), 1);
        assert_eq!(gtoc3[&Rank::Other], "first other");
    }

    #[test]
    fn test_build_is_idempotent() {
        let corpus = sample_corpus();
        let a = CorpusIndex::build(corpus.path(), &PlainTextExtractor).unwrap();
        let b = CorpusIndex::build(corpus.path(), &PlainTextExtractor).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let corpus = sample_corpus();
        let before = CorpusIndex::build(corpus.path(), &PlainTextExtractor).unwrap();
        write(corpus.path(), "GTOC5/bronze-3rd/report.pdf", "revised bronze");
        let after = CorpusIndex::build(corpus.path(), &PlainTextExtractor).unwrap();
        assert_ne!(before.fingerprint(), after.fingerprint());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CorpusIndex::build(&dir.path().join("nope"), &PlainTextExtractor);
        assert!(result.is_err());
    }

    #[test]
    fn test_collect_problem_samples() {
        let corpus = sample_corpus();
        write(corpus.path(), "GTOC9/gtoc9-problem.PDF", &"x".repeat(1500));
        write(corpus.path(), "GTOC9/problemset.pdf", "no separator, not a match");
        let samples = collect_problem_samples(corpus.path(), &PlainTextExtractor).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], "Asteroid rendezvous challenge");
        assert_eq!(samples[1].chars().count(), 1000);
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("Δv budget", 2), "Δv");
        assert_eq!(excerpt("short", 100), "short");
        assert_eq!(excerpt("", 3), "");
    }
}
