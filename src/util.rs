#[inline]
pub fn char_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(&b)
    } else {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    }
}

/// Whether `pattern` is a subsequence of `choice`, scanning greedily from the left.
pub fn cheap_matches(choice: &str, pattern: &str, case_sensitive: bool) -> bool {
    let mut choice_iter = choice.chars().peekable();
    let mut pattern_iter = pattern.chars().peekable();
    while let (Some(&c), Some(&p)) = (choice_iter.peek(), pattern_iter.peek()) {
        if char_equal(c, p, case_sensitive) {
            pattern_iter.next();
        }
        choice_iter.next();
    }

    pattern_iter.peek().is_none()
}

pub fn contains_upper(string: &str) -> bool {
    string.chars().any(char::is_uppercase)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CharType {
    NonWord,
    Lower,
    Upper,
    Number,
}

/// Classify a character. `'\0'` stands in for "before the first character" and is a non-word,
/// so the first character of a choice always starts a segment.
#[inline]
pub fn char_type_of(ch: char) -> CharType {
    if ch.is_lowercase() {
        CharType::Lower
    } else if ch.is_uppercase() {
        CharType::Upper
    } else if ch.is_numeric() {
        CharType::Number
    } else if ch.is_alphabetic() {
        // caseless scripts such as CJK
        CharType::Lower
    } else {
        CharType::NonWord
    }
}

#[cfg(test)]
pub fn wrap_matches(line: &str, indices: &[crate::IndexType]) -> String {
    let mut ret = String::new();
    let mut peekable = indices.iter().peekable();
    for (idx, ch) in line.chars().enumerate() {
        if peekable.peek().is_some_and(|&&next| next as usize == idx) {
            ret.push_str(format!("[{}]", ch).as_str());
            peekable.next();
        } else {
            ret.push(ch);
        }
    }

    ret
}

/// Assert that `rank` keeps `choices` in the given order, i.e. every choice matches and scores
/// at least as high as the ones after it.
#[cfg(test)]
pub fn assert_order(matcher: &dyn crate::FuzzyMatcher, pattern: &str, choices: &[&'static str]) {
    let result: Vec<_> = crate::rank(matcher, pattern, choices)
        .into_iter()
        .map(|m| (m.candidate, m.score))
        .collect();

    let ordered: Vec<_> = result.iter().map(|&(candidate, _)| candidate).collect();
    if ordered != choices {
        panic!(
            "pattern={}\nexpected={:#?}\nactual={:#?}",
            pattern, choices, result
        );
    }
}
