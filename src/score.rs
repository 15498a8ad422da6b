//! Scoring policy of [`FolderMatcher`](crate::FolderMatcher).
//!
//! Only the relative weights matter: a tight run beats scattered matches, a match at the start
//! of a path segment beats one buried inside a word, an exact-case match beats a case-folded one
//! and an early match beats a late one.

pub trait ScoreConfig: Send + Sync {
    fn score_match(&self) -> i32;
    fn gap_start(&self) -> i32;
    fn gap_extension(&self) -> i32;

    /// Multiplier applied to the in-place bonus of a match on the very first character of the
    /// choice, so that `ff doc` prefers `docs` over `my_docs`.
    fn bonus_first_char_multiplier(&self) -> i32;

    /// Bonus for matching the first character of a path segment, i.e. a character following
    /// `/`, `_`, `-` or any other non-word character.
    fn bonus_boundary(&self) -> i32 {
        self.score_match() / 2
    }

    /// Bonus for matching a non-word character itself, e.g. the `/` of `src/`.
    fn bonus_non_word(&self) -> i32 {
        self.score_match() / 2
    }

    /// Bonus for the hump of a camelCase word or the first digit after letters.
    /// Slightly lower than a real boundary since no separator is skipped to get there.
    fn bonus_camel123(&self) -> i32 {
        self.bonus_boundary() + self.gap_extension()
    }

    /// Bonus for a match right after another match. It must outweigh a boundary bonus minus the
    /// cost of a one character gap, otherwise `a-b-c` would tie with `abc`.
    fn bonus_consecutive(&self) -> i32 {
        self.score_match() / 2
    }

    /// Applied when matching case-insensitively and the cases differ.
    fn penalty_case_mismatch(&self) -> i32 {
        self.gap_extension() * 2
    }

    /// Applied once for every character skipped before the first match.
    fn penalty_leading(&self) -> i32 {
        self.gap_extension()
    }

    /// Upper bound (in magnitude) of the total leading penalty. Search paths nest at different
    /// depths, so past this point a longer prefix no longer costs anything.
    fn penalty_max_leading(&self) -> i32 {
        -self.score_match() / 2
    }
}

#[derive(Default, Debug, Copy, Clone)]
pub struct DefaultScoreConfig {}

impl ScoreConfig for DefaultScoreConfig {
    fn score_match(&self) -> i32 {
        16
    }

    fn gap_start(&self) -> i32 {
        -3
    }

    fn gap_extension(&self) -> i32 {
        -1
    }

    fn bonus_first_char_multiplier(&self) -> i32 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let config = DefaultScoreConfig::default();
        assert_eq!(config.bonus_boundary(), 8);
        assert_eq!(config.bonus_non_word(), 8);
        assert_eq!(config.bonus_camel123(), 7);
        assert_eq!(config.bonus_consecutive(), 8);
        assert_eq!(config.penalty_case_mismatch(), -2);
        assert_eq!(config.penalty_leading(), -1);
        assert_eq!(config.penalty_max_leading(), -8);
    }
    #[test]
    fn test_run_outweighs_separated_boundaries() {
        let config = DefaultScoreConfig::default();
        let one_char_gap = config.gap_start() + config.gap_extension();
        assert!(config.bonus_consecutive() > config.bonus_boundary() + one_char_gap);
    }
}
