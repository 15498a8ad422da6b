use ff::display::{highlight, Highlight};
use ff::{FolderMatcher, FuzzyMatcher};
use proptest::prelude::*;
use termion::color::{self, Fg};
use termion::style::{Bold, Reset};

fn is_subsequence(pattern: &str, choice: &str) -> bool {
    let mut chars = choice.chars();
    pattern
        .chars()
        .all(|p| chars.any(|c| c.eq_ignore_ascii_case(&p)))
}

/// A choice together with a pattern picked out of it.
fn choice_with_subsequence(choice: &'static str) -> impl Strategy<Value = (String, String)> {
    choice.prop_flat_map(|choice| {
        let len = choice.chars().count();
        (Just(choice), prop::collection::vec(any::<bool>(), len)).prop_map(|(choice, mask)| {
            let pattern = choice
                .chars()
                .zip(mask)
                .filter_map(|(ch, keep)| keep.then_some(ch))
                .collect();
            (choice, pattern)
        })
    })
}

fn assert_valid_indices(choice: &str, pattern: &str, indices: &[ff::IndexType]) {
    let chars: Vec<char> = choice.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    assert_eq!(indices.len(), pattern.len());
    assert!(indices.windows(2).all(|w| w[0] < w[1]), "{indices:?}");
    for (&idx, p) in indices.iter().zip(pattern) {
        let c = chars[idx as usize];
        assert!(c.to_lowercase().eq(p.to_lowercase()), "{c} != {p}");
    }
}

proptest! {
    #[test]
    fn matches_iff_subsequence(choice in "[a-zA-Z/_ .-]{0,24}", pattern in "[a-zA-Z]{1,4}") {
        let matcher = FolderMatcher::default();
        let matched = matcher.fuzzy_indices(&choice, &pattern);
        prop_assert_eq!(matched.is_some(), is_subsequence(&pattern, &choice));
        if let Some((_, indices)) = matched {
            assert_valid_indices(&choice, &pattern, &indices);
        }
    }

    #[test]
    fn extracted_subsequence_always_matches(
        (choice, pattern) in choice_with_subsequence("[a-zA-Z0-9/_-]{0,32}")
    ) {
        let matcher = FolderMatcher::default();
        let (score, indices) = matcher.fuzzy_indices(&choice, &pattern).unwrap();
        assert_valid_indices(&choice, &pattern, &indices);
        prop_assert_eq!(matcher.fuzzy_match(&choice, &pattern), Some(score));
    }

    #[test]
    fn missing_char_never_matches(choice in "[a-z/_-]{0,24}", pattern in "[a-z]{0,3}") {
        let matcher = FolderMatcher::default();
        let pattern = format!("{pattern}9");
        prop_assert!(matcher.fuzzy_indices(&choice, &pattern).is_none());
        prop_assert!(matcher.fuzzy_match(&choice, &pattern).is_none());
    }

    #[test]
    fn rank_is_sorted_and_stable(
        choices in prop::collection::vec("[abc/_-]{0,8}", 0..16),
        pattern in "[abc]{0,3}",
    ) {
        let matcher = FolderMatcher::default();
        let results = matcher.rank(&pattern, &choices);

        let expected: Vec<usize> = (0..choices.len())
            .filter(|&idx| is_subsequence(&pattern, &choices[idx]))
            .collect();
        let mut matched: Vec<usize> = results.iter().map(|m| m.index).collect();
        matched.sort_unstable();
        prop_assert_eq!(matched, expected);

        for w in results.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
            if w[0].score == w[1].score {
                prop_assert!(w[0].index < w[1].index);
            }
        }
        for result in &results {
            prop_assert_eq!(result.candidate, choices[result.index].as_str());
            assert_valid_indices(result.candidate, &pattern, &result.indices);
        }
    }

    #[test]
    fn highlight_keeps_multibyte_chars(
        (choice, pattern) in choice_with_subsequence("[a-zé世界ß/_]{0,16}")
    ) {
        let matcher = FolderMatcher::default();
        let (_, indices) = matcher.fuzzy_indices(&choice, &pattern).unwrap();
        assert_valid_indices(&choice, &pattern, &indices);

        let highlighted = highlight(&choice, &indices, Highlight::Ansi);
        let start = format!("{}{}", Bold, Fg(color::LightGreen));
        let stripped = highlighted.replace(&start, "").replace(&Reset.to_string(), "");
        prop_assert_eq!(stripped, choice);
    }
}
