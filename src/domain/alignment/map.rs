//! Greedy forward-only alignment map

use super::normalize::normalize_token;
use super::timestamp::WordTimestamp;
use super::tokens::RenderedToken;

/// Index correspondence from timestamp entries to rendered tokens.
///
/// Entry `i` is the token index matched by timestamp `i`, or `None` when the
/// timestamp could not be matched. Matched indices strictly increase with `i`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentMap {
    entries: Vec<Option<usize>>,
}

impl AlignmentMap {
    /// Build the map with a single greedy pass.
    ///
    /// A cursor walks the token list and never moves backward. Each timestamp
    /// scans forward from the cursor for the first token with the same
    /// normalized form. A miss leaves the cursor at the end of the token list,
    /// so every later timestamp of this text is unmatched as well.
    pub fn build(timestamps: &[WordTimestamp], tokens: &[RenderedToken]) -> Self {
        let normalized: Vec<String> = tokens.iter().map(|t| normalize_token(&t.text)).collect();
        let mut entries = Vec::with_capacity(timestamps.len());
        let mut cursor = 0;

        for ts in timestamps {
            let word = normalize_token(&ts.word);
            if word.is_empty() {
                entries.push(None);
                continue;
            }

            let mut matched = None;
            while cursor < normalized.len() {
                let candidate = cursor;
                cursor += 1;
                if normalized[candidate] == word {
                    matched = Some(tokens[candidate].index);
                    break;
                }
            }

            entries.push(matched);
        }

        Self { entries }
    }

    /// Token index for timestamp `i`, if it was matched
    pub fn get(&self, i: usize) -> Option<usize> {
        self.entries.get(i).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of matched entries
    pub fn matched_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.entries
    }
}

/// Timestamps plus their alignment onto the displayed tokens
#[derive(Debug, Clone, Default)]
pub struct WordAligner {
    timestamps: Vec<WordTimestamp>,
    map: AlignmentMap,
}

impl WordAligner {
    /// Align `timestamps` against `tokens`; computed once per text load
    pub fn new(timestamps: Vec<WordTimestamp>, tokens: &[RenderedToken]) -> Self {
        let map = AlignmentMap::build(&timestamps, tokens);
        Self { timestamps, map }
    }

    pub fn map(&self) -> &AlignmentMap {
        &self.map
    }

    pub fn timestamps(&self) -> &[WordTimestamp] {
        &self.timestamps
    }

    /// Token to highlight at `position` seconds.
    ///
    /// - No timestamp interval contains `position`: `None` (clear).
    /// - The containing timestamp is unmatched: `previous` is kept so short
    ///   unaligned entries do not flicker the highlight.
    /// - Otherwise the matched token index.
    pub fn current_highlight_token(&self, position: f64, previous: Option<usize>) -> Option<usize> {
        let i = self.timestamps.iter().position(|ts| ts.contains(position))?;
        self.map.get(i).or(previous)
    }
}
