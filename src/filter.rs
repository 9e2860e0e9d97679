//! Ordered-subsequence filtering, deterministic ranking and cycling over
//! candidate lists.

use std::path::Path;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::search::Candidate;

/// Whether every char of `query` appears in `label`, in order.
///
/// Case folding is per codepoint (`char::to_lowercase`), no normalization.
pub fn is_subsequence(query: &str, label: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        subsequence(query.chars(), label.chars())
    } else {
        subsequence(
            query.chars().flat_map(char::to_lowercase),
            label.chars().flat_map(char::to_lowercase),
        )
    }
}

fn subsequence(
    mut query: impl Iterator<Item = char>,
    mut label: impl Iterator<Item = char>,
) -> bool {
    query.all(|q| label.any(|c| c == q))
}

/// Keep the candidates whose label contains `query` as a subsequence.
/// An empty query keeps everything, in the original order.
pub fn filter_by_subsequence(
    candidates: &[Candidate],
    query: &str,
    case_sensitive: bool,
) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|c| is_subsequence(query, &c.label, case_sensitive))
        .cloned()
        .collect()
}

/// Stable sort by lowercased `(label, detail)`.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_cached_key(Candidate::sort_key);
    candidates
}

/// Filter then rank: the picker's transition on every query change.
pub fn refine(candidates: &[Candidate], query: &str, case_sensitive: bool) -> Vec<Candidate> {
    rank(filter_by_subsequence(candidates, query, case_sensitive))
}

/// The candidate after `current`, wrapping past the end. `None` when
/// `current` is not in the list.
pub fn advance<'a>(candidates: &'a [Candidate], current: &Path) -> Option<&'a Candidate> {
    let index = candidates.iter().position(|c| c.path == current)?;
    candidates.get((index + 1) % candidates.len())
}

/// Char indices of `label` to highlight for `query`.
pub fn match_indices(label: &str, query: &str, case_sensitive: bool) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    let matcher = if case_sensitive {
        SkimMatcherV2::default().respect_case()
    } else {
        SkimMatcherV2::default().ignore_case()
    };
    matcher
        .fuzzy_indices(label, query)
        .map(|(_, indices)| indices)
        .unwrap_or_else(|| greedy_indices(label, query, case_sensitive))
}

/// Leftmost match positions, used when the scorer declines a match that the
/// subsequence filter accepted.
fn greedy_indices(label: &str, query: &str, case_sensitive: bool) -> Vec<usize> {
    let fold = |c: char| -> Vec<char> {
        if case_sensitive {
            vec![c]
        } else {
            c.to_lowercase().collect()
        }
    };
    let mut wanted = query.chars().flat_map(fold).peekable();
    let mut indices = Vec::new();
    for (i, c) in label.chars().enumerate() {
        let Some(&next) = wanted.peek() else { break };
        if fold(c).first() == Some(&next) {
            indices.push(i);
            wanted.next();
        }
    }
    indices
}
