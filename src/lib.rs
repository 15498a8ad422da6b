//! Find folders whose path fuzzily matches a search pattern.
//!
//! The heart of the crate is [`FolderMatcher`], a fuzzy subsequence matcher that scores every
//! candidate with a dynamic program and reports which characters were matched. [`rank`] runs it
//! over a list of candidates and orders the results. The remaining modules are the glue used by
//! the `ff` binary: loading the search paths, listing folders and printing highlighted results.
//!
//! # Example:
//! ```
//! use ff::FolderMatcher;
//!
//! let matcher = FolderMatcher::default();
//! let folders = ["/src/a-b-c", "/src/abc", "/src/xyz"];
//! let results = matcher.rank("abc", &folders);
//!
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].candidate, "/src/abc");
//! assert_eq!(results[0].indices, [5, 6, 7]);
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod folder;
pub mod rank;
pub mod score;
mod util;
pub mod walk;

pub use folder::{CaseMatching, FolderMatcher};
pub use rank::{rank, MatchResult};

#[cfg(not(feature = "compact"))]
pub type IndexType = usize;
#[cfg(feature = "compact")]
pub type IndexType = u32;

pub type ScoreType = i64;

/// Score given to every candidate when the pattern is empty.
pub const EMPTY_QUERY_SCORE: ScoreType = 0;

pub trait FuzzyMatcher: Send + Sync {
    /// fuzzy match choice with pattern, and return the score & matched indices of characters
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, Vec<IndexType>)>;

    /// fuzzy match choice with pattern, and return the score of matching
    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy_indices(choice, pattern).map(|(score, _)| score)
    }
}
