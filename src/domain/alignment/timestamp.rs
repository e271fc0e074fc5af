//! Word timestamp value object

use serde::{Deserialize, Serialize};

/// Timing of one spoken word, as reported by the synthesis backend.
/// Times are seconds from the start of the audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl WordTimestamp {
    /// Create a new word timestamp
    pub fn new(word: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            word: word.into(),
            start_time,
            end_time,
        }
    }

    /// Whether `position` falls in `[start_time, end_time)`
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start_time && position < self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let ts = WordTimestamp::new("hello", 0.0, 0.4);
        assert!(ts.contains(0.0));
        assert!(ts.contains(0.39));
        assert!(!ts.contains(0.4));
        assert!(!ts.contains(-0.1));
    }
}
