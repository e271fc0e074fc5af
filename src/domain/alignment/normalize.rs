//! Token normalization used for alignment comparisons

use icu_normalizer::DecomposingNormalizerBorrowed;

/// Right single quotation mark, folded to a plain apostrophe
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';

/// Normalize a word for comparison.
///
/// Lowercases, folds `’` to `'`, strips diacritics (`café` becomes `cafe`)
/// and keeps only letters, digits, and apostrophes or hyphens inside the
/// word. Pure punctuation normalizes to an empty string.
pub fn normalize_token(token: &str) -> String {
    // Canonical decomposition splits accented letters into base letter plus
    // combining mark; the marks are not alphanumeric and get filtered below.
    let decomposed = DecomposingNormalizerBorrowed::new_nfd().normalize(token);

    let kept: String = decomposed
        .chars()
        .map(|ch| if ch == RIGHT_SINGLE_QUOTE { '\'' } else { ch })
        .filter(|ch| ch.is_alphanumeric() || is_joiner(*ch))
        .flat_map(char::to_lowercase)
        .collect();

    kept.trim_matches(is_joiner).to_string()
}

fn is_joiner(ch: char) -> bool {
    ch == '\'' || ch == '-'
}
