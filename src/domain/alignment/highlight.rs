//! Live highlight cursor

use super::map::WordAligner;

/// How the highlighted token changed after a position update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightChange {
    Unchanged,
    Moved(usize),
    Cleared,
}

/// Tracks the currently highlighted token while audio plays
#[derive(Debug, Clone, Default)]
pub struct HighlightTracker {
    aligner: WordAligner,
    current: Option<usize>,
}

impl HighlightTracker {
    pub fn new(aligner: WordAligner) -> Self {
        Self {
            aligner,
            current: None,
        }
    }

    /// Currently highlighted token
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Feed the playback position and report what changed
    pub fn update(&mut self, position: f64) -> HighlightChange {
        let next = self.aligner.current_highlight_token(position, self.current);
        if next == self.current {
            return HighlightChange::Unchanged;
        }

        self.current = next;
        match next {
            Some(index) => HighlightChange::Moved(index),
            None => HighlightChange::Cleared,
        }
    }

    /// Drop the highlight (playback ended or stopped)
    pub fn clear(&mut self) -> HighlightChange {
        match self.current.take() {
            Some(_) => HighlightChange::Cleared,
            None => HighlightChange::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alignment::{tokenize, WordTimestamp};

    fn tracker() -> HighlightTracker {
        let timestamps = vec![
            WordTimestamp::new("read", 0.1, 0.4),
            WordTimestamp::new(".", 0.4, 0.45),
            WordTimestamp::new("this", 0.5, 0.8),
        ];
        HighlightTracker::new(WordAligner::new(timestamps, &tokenize("Read. This")))
    }

    #[test]
    fn reports_moves_once() {
        let mut t = tracker();
        assert_eq!(t.update(0.2), HighlightChange::Moved(0));
        assert_eq!(t.update(0.3), HighlightChange::Unchanged);
        assert_eq!(t.update(0.6), HighlightChange::Moved(1));
        assert_eq!(t.current(), Some(1));
    }

    #[test]
    fn unmatched_entry_retains_highlight() {
        let mut t = tracker();
        t.update(0.2);
        assert_eq!(t.update(0.42), HighlightChange::Unchanged);
        assert_eq!(t.current(), Some(0));
    }

    #[test]
    fn gap_clears_highlight() {
        let mut t = tracker();
        t.update(0.2);
        assert_eq!(t.update(0.47), HighlightChange::Cleared);
        assert_eq!(t.current(), None);
        assert_eq!(t.update(0.0), HighlightChange::Unchanged);
    }

    #[test]
    fn clear_resets() {
        let mut t = tracker();
        t.update(0.6);
        assert_eq!(t.clear(), HighlightChange::Cleared);
        assert_eq!(t.clear(), HighlightChange::Unchanged);
    }
}
