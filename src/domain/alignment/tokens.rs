//! Display tokenization

/// One word-like unit of the displayed text, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedToken {
    pub index: usize,
    pub text: String,
}

impl RenderedToken {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Split display text into tokens.
///
/// Paragraphs are separated by blank lines; inside a paragraph any
/// whitespace separates tokens. Indices are assigned in document order.
pub fn tokenize(text: &str) -> Vec<RenderedToken> {
    paragraphs(text)
        .flat_map(str::split_whitespace)
        .enumerate()
        .map(|(index, word)| RenderedToken::new(index, word))
        .collect()
}

/// Iterate over non-empty paragraphs of `text`
pub fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").filter(|p| !p.trim().is_empty())
}
