use rayon::prelude::*;

use crate::{FuzzyMatcher, IndexType, ScoreType, EMPTY_QUERY_SCORE};

/// A choice that matched the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub candidate: &'a str,
    /// Position of the candidate in the input.
    pub index: usize,
    pub score: ScoreType,
    /// Matched character (not byte) indices, strictly increasing.
    pub indices: Vec<IndexType>,
}

/// Match `pattern` against every choice and return the matches, best first.
///
/// Choices are scored in parallel; matches with equal scores keep their input order. An empty
/// pattern matches everything with [`EMPTY_QUERY_SCORE`] and no indices.
pub fn rank<'a, M, S>(matcher: &M, pattern: &str, choices: &'a [S]) -> Vec<MatchResult<'a>>
where
    M: FuzzyMatcher + ?Sized,
    S: AsRef<str> + Sync,
{
    if pattern.is_empty() {
        return choices
            .iter()
            .enumerate()
            .map(|(index, choice)| MatchResult {
                candidate: choice.as_ref(),
                index,
                score: EMPTY_QUERY_SCORE,
                indices: Vec::new(),
            })
            .collect();
    }

    let mut results: Vec<MatchResult<'a>> = choices
        .par_iter()
        .enumerate()
        .filter_map(|(index, choice)| {
            let candidate = choice.as_ref();
            let (score, indices) = matcher.fuzzy_indices(candidate, pattern)?;
            Some(MatchResult {
                candidate,
                index,
                score,
                indices,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
    results
}
