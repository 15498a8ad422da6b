//! The fuzzy matching algorithm used to rank folders.
//!
//! # Example:
//! ```
//! use ff::FuzzyMatcher;
//! use ff::folder::FolderMatcher;
//!
//! let matcher = FolderMatcher::default();
//! assert_eq!(None, matcher.fuzzy_match("abc", "abx"));
//! assert!(matcher.fuzzy_match("axbycz", "abc").is_some());
//! assert!(matcher.fuzzy_match("axbycz", "xyz").is_some());
//!
//! let (_score, indices) = matcher.fuzzy_indices("axbycz", "abc").unwrap();
//! assert_eq!(indices, [0, 2, 4]);
//! ```
use std::cell::RefCell;
use std::cmp::max;

use thread_local::ThreadLocal;

use crate::rank::{rank, MatchResult};
use crate::score::{DefaultScoreConfig, ScoreConfig};
use crate::util::{char_equal, char_type_of, cheap_matches, contains_upper, CharType};
use crate::{FuzzyMatcher, IndexType, ScoreType, EMPTY_QUERY_SCORE};

#[derive(Eq, PartialEq, Debug, Copy, Clone, Default)]
pub enum CaseMatching {
    /// Always compare characters exactly.
    Respect,
    /// Compare characters case-insensitively, exact case still scores higher.
    #[default]
    Ignore,
    /// Respect case only when the pattern contains an uppercase character.
    Smart,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Movement {
    Match,
    Skip,
}

/// Inner state of the score matrix
#[derive(Debug, Copy, Clone)]
struct MatrixCell {
    pub movement: Movement,
    pub score: i32, // The max score of align pattern[..i] & choice[..j]
}

const MATRIX_CELL_NEG_INFINITY: i32 = i32::MIN;

impl Default for MatrixCell {
    fn default() -> Self {
        Self {
            movement: Movement::Skip,
            score: MATRIX_CELL_NEG_INFINITY,
        }
    }
}

/// Add to a cell score, keeping unreachable cells unreachable.
#[inline]
fn extend(score: i32, delta: i32) -> i32 {
    if score == MATRIX_CELL_NEG_INFINITY {
        MATRIX_CELL_NEG_INFINITY
    } else {
        score.saturating_add(delta)
    }
}

/// Simulate a 1-D vector as 2-D matrix
struct ScoreMatrix<'a> {
    matrix: &'a mut Vec<MatrixCell>,
    pub rows: usize,
    pub cols: usize,
}

impl<'a> ScoreMatrix<'a> {
    /// given a matrix, extend it to be (rows x cols)
    pub fn new(matrix: &'a mut Vec<MatrixCell>, rows: usize, cols: usize) -> Self {
        matrix.resize(rows * cols, MatrixCell::default());
        ScoreMatrix { matrix, rows, cols }
    }

    #[inline]
    fn get_score(&self, row: usize, col: usize) -> i32 {
        self.matrix[row * self.cols + col].score
    }

    #[inline]
    fn get_movement(&self, row: usize, col: usize) -> Movement {
        self.matrix[row * self.cols + col].movement
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, score: i32, movement: Movement) {
        self.matrix[row * self.cols + col] = MatrixCell { movement, score };
    }

    fn get_row(&self, row: usize) -> &[MatrixCell] {
        let start = row * self.cols;
        &self.matrix[start..start + self.cols]
    }
}

/// Fuzzy matching is a sub problem of sequence alignment with affine gap penalty.
///
/// Given `pattern`(i) and `choice`(j), we maintain 2 score matrices:
///
/// ```text
/// M[i][j] = match(i, j) + max(M[i-1][j-1] + consecutive, P[i-1][j-1])
/// M[i][j] = -infinity if p[i] and c[j] do not match
/// P[i][j] = max(gap_start + gap_extend + M[i][j-1], gap_extend + P[i][j-1])
/// P[0][j] = j * leading
/// ```
///
/// `M[i][j]` is the best alignment of `p[..=i]` and `c[..=j]` where `c[j]` is matched, `P[i][j]`
/// the best one where `c[j]` is skipped. The score of a choice is the best cell of the last `M`
/// row, and the matched indices are recovered by following the recorded movements back.
///
/// Every choice is scored on its own, so a single matcher can be shared by many threads. The
/// matrices are cached per thread.
pub struct FolderMatcher {
    score_config: Box<dyn ScoreConfig>,
    case: CaseMatching,

    m_cache: ThreadLocal<RefCell<Vec<MatrixCell>>>,
    p_cache: ThreadLocal<RefCell<Vec<MatrixCell>>>,
    c_cache: ThreadLocal<RefCell<Vec<char>>>, // characters of the choice
}

impl Default for FolderMatcher {
    fn default() -> Self {
        Self {
            score_config: Box::new(DefaultScoreConfig::default()),
            case: CaseMatching::default(),
            m_cache: ThreadLocal::new(),
            p_cache: ThreadLocal::new(),
            c_cache: ThreadLocal::new(),
        }
    }
}

impl FolderMatcher {
    pub fn score_config(mut self, score_config: Box<dyn ScoreConfig>) -> Self {
        self.score_config = score_config;
        self
    }

    pub fn case(mut self, case: CaseMatching) -> Self {
        self.case = case;
        self
    }

    pub fn ignore_case(self) -> Self {
        self.case(CaseMatching::Ignore)
    }

    pub fn smart_case(self) -> Self {
        self.case(CaseMatching::Smart)
    }

    pub fn respect_case(self) -> Self {
        self.case(CaseMatching::Respect)
    }

    /// Match `pattern` against every choice, best first. See [`crate::rank()`].
    pub fn rank<'a, S>(&self, pattern: &str, choices: &'a [S]) -> Vec<MatchResult<'a>>
    where
        S: AsRef<str> + Sync,
    {
        rank(self, pattern, choices)
    }

    fn is_case_sensitive(&self, pattern: &str) -> bool {
        match self.case {
            CaseMatching::Respect => true,
            CaseMatching::Ignore => false,
            CaseMatching::Smart => contains_upper(pattern),
        }
    }

    /// Build the score matrix using the algorithm described above
    fn build_score_matrix(
        &self,
        m: &mut ScoreMatrix,
        p: &mut ScoreMatrix,
        choice: &[char],
        pattern: &str,
        compressed: bool,
        case_sensitive: bool,
    ) {
        let config = &self.score_config;
        let gap_open = config.gap_start() + config.gap_extension();

        // nothing matched yet: every skipped character is a leading one
        for j in 0..m.cols {
            let leading = max(
                config.penalty_leading().saturating_mul(j as i32),
                config.penalty_max_leading(),
            );
            m.set(0, j, MATRIX_CELL_NEG_INFINITY, Movement::Skip);
            p.set(0, j, leading, Movement::Skip);
        }

        for (i, p_ch) in pattern.chars().enumerate() {
            let row = self.adjust_row_idx(i + 1, compressed);
            let row_prev = self.adjust_row_idx(i, compressed);

            m.set(row, 0, MATRIX_CELL_NEG_INFINITY, Movement::Skip);
            p.set(row, 0, MATRIX_CELL_NEG_INFINITY, Movement::Skip);

            let mut prev_ch = '\0';
            for (j, &c_ch) in choice.iter().enumerate() {
                let col = j + 1;
                let col_prev = j;

                // update M matrix
                match self.calculate_match_score(prev_ch, c_ch, p_ch, j, case_sensitive) {
                    Some(match_score) => {
                        let prev_match_score =
                            extend(m.get_score(row_prev, col_prev), config.bonus_consecutive());
                        let prev_skip_score = p.get_score(row_prev, col_prev);
                        let (score, movement) = if prev_match_score >= prev_skip_score {
                            (prev_match_score, Movement::Match)
                        } else {
                            (prev_skip_score, Movement::Skip)
                        };
                        m.set(row, col, extend(score, match_score), movement);
                    }
                    None => m.set(row, col, MATRIX_CELL_NEG_INFINITY, Movement::Skip),
                }

                // update P matrix
                let prev_match_score = extend(m.get_score(row, col_prev), gap_open);
                let prev_skip_score = extend(p.get_score(row, col_prev), config.gap_extension());
                if prev_match_score >= prev_skip_score {
                    p.set(row, col, prev_match_score, Movement::Match);
                } else {
                    p.set(row, col, prev_skip_score, Movement::Skip);
                }

                prev_ch = c_ch;
            }
        }
    }

    /// In case we don't need to backtrack the matching indices, we could use only 2 rows for the
    /// matrix, this function could be used to rotate accessing these two rows.
    fn adjust_row_idx(&self, row_idx: usize, compressed: bool) -> usize {
        if compressed {
            row_idx & 1
        } else {
            row_idx
        }
    }

    /// Calculate the matching score of the characters
    /// return None if not matched.
    fn calculate_match_score(
        &self,
        prev_ch: char,
        c: char,
        p: char,
        c_idx: usize,
        case_sensitive: bool,
    ) -> Option<i32> {
        if !char_equal(c, p, case_sensitive) {
            return None;
        }

        let score = self.score_config.score_match();

        // check bonus for start of a segment, camel case, etc.
        let mut bonus = self.in_place_bonus(char_type_of(prev_ch), char_type_of(c));

        // bonus for matching the start of the whole choice string
        if c_idx == 0 {
            bonus *= self.score_config.bonus_first_char_multiplier();
        }

        // penalty on case mismatch
        if !case_sensitive && p != c {
            bonus += self.score_config.penalty_case_mismatch();
        }

        Some(max(0, score + bonus))
    }

    fn in_place_bonus(&self, prev_char_type: CharType, char_type: CharType) -> i32 {
        match (prev_char_type, char_type) {
            (CharType::NonWord, t) if t != CharType::NonWord => self.score_config.bonus_boundary(),
            (CharType::Lower, CharType::Upper) => self.score_config.bonus_camel123(),
            (t, CharType::Number) if t != CharType::Number => self.score_config.bonus_camel123(),
            (_, CharType::NonWord) => self.score_config.bonus_non_word(),
            _ => 0,
        }
    }

    /// Walk back from `M[row][col]` and collect the matched columns.
    fn backtrack(&self, m: &ScoreMatrix, p: &ScoreMatrix, row: usize, col: usize) -> Vec<IndexType> {
        let mut positions = Vec::with_capacity(row);
        let (mut i, mut j) = (row, col);
        let mut in_match = true;
        while i > 0 {
            if in_match {
                positions.push((j - 1) as IndexType);
                in_match = m.get_movement(i, j) == Movement::Match;
                i -= 1;
            } else {
                in_match = p.get_movement(i, j) == Movement::Match;
            }
            j -= 1;
        }
        positions.reverse();
        positions
    }

    pub fn fuzzy(
        &self,
        choice: &str,
        pattern: &str,
        with_pos: bool,
    ) -> Option<(ScoreType, Vec<IndexType>)> {
        if pattern.is_empty() {
            return Some((EMPTY_QUERY_SCORE, Vec::new()));
        }

        let case_sensitive = self.is_case_sensitive(pattern);
        let compressed = !with_pos;

        if !cheap_matches(choice, pattern, case_sensitive) {
            return None;
        }

        let mut choice_chars = self
            .c_cache
            .get_or(|| RefCell::new(Vec::new()))
            .borrow_mut();
        choice_chars.clear();
        choice_chars.extend(choice.chars());

        let cols = choice_chars.len() + 1;
        let num_char_pattern = pattern.chars().count();
        let rows = if compressed { 2 } else { num_char_pattern + 1 };

        // initialize the score matrix
        let mut m = self
            .m_cache
            .get_or(|| RefCell::new(Vec::new()))
            .borrow_mut();
        let mut m = ScoreMatrix::new(&mut m, rows, cols);
        let mut p = self
            .p_cache
            .get_or(|| RefCell::new(Vec::new()))
            .borrow_mut();
        let mut p = ScoreMatrix::new(&mut p, rows, cols);

        self.build_score_matrix(
            &mut m,
            &mut p,
            &choice_chars,
            pattern,
            compressed,
            case_sensitive,
        );

        // earliest column holding the best score
        let last_row = m.get_row(self.adjust_row_idx(num_char_pattern, compressed));
        let (col, score) = last_row
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.score != MATRIX_CELL_NEG_INFINITY)
            .fold(None, |best: Option<(usize, i32)>, (col, cell)| match best {
                Some((_, score)) if score >= cell.score => best,
                _ => Some((col, cell.score)),
            })?;

        let positions = if with_pos {
            self.backtrack(&m, &p, m.rows - 1, col)
        } else {
            Vec::new()
        };

        Some((score as ScoreType, positions))
    }
}

impl FuzzyMatcher for FolderMatcher {
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, Vec<IndexType>)> {
        self.fuzzy(choice, pattern, true)
    }

    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy(choice, pattern, false).map(|(score, _)| score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{assert_order, wrap_matches};

    fn wrap_fuzzy_match(matcher: &dyn FuzzyMatcher, line: &str, pattern: &str) -> Option<String> {
        let (_score, indices) = matcher.fuzzy_indices(line, pattern)?;
        Some(wrap_matches(line, &indices))
    }

    #[test]
    fn test_match_or_not() {
        let matcher = FolderMatcher::default();

        assert_eq!(matcher.fuzzy_match("", ""), Some(0));
        assert_eq!(matcher.fuzzy_match("abcdefaghi", ""), Some(0));
        assert_eq!(matcher.fuzzy_indices("abcdefaghi", ""), Some((0, vec![])));
        assert_eq!(matcher.fuzzy_match("", "a"), None);
        assert_eq!(matcher.fuzzy_match("abcdefaghi", "中"), None);
        assert_eq!(matcher.fuzzy_match("abc", "abx"), None);
        assert_eq!(matcher.fuzzy_match("ab", "abc"), None);
        assert!(matcher.fuzzy_match("axbycz", "abc").is_some());
        assert!(matcher.fuzzy_match("axbycz", "xyz").is_some());

        assert_eq!(
            &wrap_fuzzy_match(&matcher, "axbycz", "abc").unwrap(),
            "[a]x[b]y[c]z"
        );
        assert_eq!(
            &wrap_fuzzy_match(&matcher, "axbycz", "xyz").unwrap(),
            "a[x]b[y]c[z]"
        );
        assert_eq!(
            &wrap_fuzzy_match(&matcher, "Hello, 世界", "H世").unwrap(),
            "[H]ello, [世]界"
        );
    }

    #[test]
    fn test_case_matching() {
        let ignore = FolderMatcher::default();
        assert!(ignore.fuzzy_match("aBc", "abc").is_some());
        assert!(ignore.fuzzy_match("aBc", "ABC").is_some());
        assert!(ignore.fuzzy_match("Éclair", "écl").is_some());

        let smart = FolderMatcher::default().smart_case();
        assert!(smart.fuzzy_match("aBc", "abc").is_some());
        assert!(smart.fuzzy_match("aBc", "aBc").is_some());
        assert!(smart.fuzzy_match("aBc", "aBC").is_none());

        let respect = FolderMatcher::default().respect_case();
        assert!(respect.fuzzy_match("aBc", "abc").is_none());
        assert!(respect.fuzzy_match("aBc", "aBc").is_some());
    }

    #[test]
    fn test_best_alignment_is_not_greedy() {
        let matcher = FolderMatcher::default();
        assert_eq!(
            &wrap_fuzzy_match(&matcher, "xaxbxcabc", "abc").unwrap(),
            "xaxbxc[a][b][c]"
        );
        assert_eq!(
            &wrap_fuzzy_match(&matcher, "random_doc", "doc").unwrap(),
            "random_[d][o][c]"
        );
    }

    #[test]
    fn test_score_without_positions_is_the_same() {
        let matcher = FolderMatcher::default();
        for (choice, pattern) in [
            ("axbycz", "abc"),
            ("xaxbxcabc", "abc"),
            ("/home/me/code/ff", "ff"),
            ("camel case", "cc"),
            ("Hello, 世界", "h世"),
            ("a/b/c/d/e/f/g", "abcdefg"),
        ] {
            let (score, _) = matcher.fuzzy_indices(choice, pattern).unwrap();
            assert_eq!(matcher.fuzzy_match(choice, pattern), Some(score), "{choice}");
        }
    }

    #[test]
    fn test_indices_are_chars() {
        let matcher = FolderMatcher::default();
        let (_, indices) = matcher.fuzzy_indices("/tmp/Ünïcödé", "ncd").unwrap();
        assert_eq!(indices, [6, 8, 10]);
    }

    #[test]
    fn test_match_quality() {
        let matcher = FolderMatcher::default();
        // consecutive
        assert_order(&matcher, "abc", &["abc", "a-b-c"]);
        assert_order(&matcher, "print", &["printf", "sprintf"]);
        // boundaries
        assert_order(&matcher, "doc", &["my/docs", "random_doc", "abcdoc"]);
        assert_order(&matcher, "ab", &["ab", "aoo_boo", "acb"]);
        assert_order(&matcher, "is", &["isIEEE", "inSuf"]);
        assert_order(&matcher, "cc", &["camel case", "camelCase", "camelcase"]);
        // case
        assert_order(&matcher, "Doc", &["Document", "document"]);
        // position
        assert_order(&matcher, "doc", &["/a/doc", "/abc/doc"]);
        // a deep prefix stops costing past a point
        assert_order(&matcher, "ff", &["/home/me/archive/2019/projects/ff", "/srv/fxf"]);
        assert_order(&matcher, "abc", &["/home/someone/work/clients/acme/abc", "/opt/a-b-c"]);
    }

    #[test]
    fn test_strictly_better() {
        let matcher = FolderMatcher::default();
        let score = |choice| matcher.fuzzy_match(choice, "abc").unwrap();
        assert!(score("abc") > score("a-b-c"));

        let score = |choice| matcher.fuzzy_match(choice, "Doc").unwrap();
        assert!(score("Document") > score("document"));
    }

    #[test]
    fn test_shared_between_threads() {
        let matcher = FolderMatcher::default();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let (_, indices) = matcher.fuzzy_indices("axbycz", "xyz").unwrap();
                        assert_eq!(indices, [1, 3, 5]);
                    }
                });
            }
        });
    }
}
