//! Terminal reader view
//!
//! Prints the text once, then keeps a single status line showing the word
//! being spoken with a few words of context on either side.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use colored::*;

use crate::application::ports::{ReaderError, ReaderSurface};
use crate::domain::alignment::RenderedToken;

/// Words of context shown on each side of the highlighted word
const CONTEXT_WORDS: usize = 6;

/// Reader that renders into the terminal
pub struct TerminalReader {
    words: Mutex<Vec<String>>,
    context: usize,
}

impl TerminalReader {
    pub fn new() -> Self {
        Self {
            words: Mutex::new(Vec::new()),
            context: CONTEXT_WORDS,
        }
    }

    fn write(&self, text: &str) -> Result<(), ReaderError> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| ReaderError::Render(e.to_string()))
    }
}

impl Default for TerminalReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Words before, at, and after `index`, limited to `context` on each side
fn window(words: &[String], index: usize, context: usize) -> Option<(String, &str, String)> {
    let current = words.get(index)?;
    let start = index.saturating_sub(context);
    let end = (index + 1 + context).min(words.len());

    Some((
        words[start..index].join(" "),
        current.as_str(),
        words[index + 1..end].join(" "),
    ))
}

impl ReaderSurface for TerminalReader {
    fn show_text(&self, tokens: &[RenderedToken]) -> Result<(), ReaderError> {
        let words: Vec<String> = tokens.iter().map(|t| t.text.clone()).collect();
        let body = format!("\n{}\n{}\n\n", "Reader".bold().cyan(), words.join(" "));
        *self.words.lock().unwrap_or_else(PoisonError::into_inner) = words;
        self.write(&body)
    }

    fn set_highlight(&self, token: Option<usize>) -> Result<(), ReaderError> {
        let words = self.words.lock().unwrap_or_else(PoisonError::into_inner);

        let line = match token.and_then(|i| window(&words, i, self.context)) {
            Some((before, current, after)) => format!(
                "\r\x1b[2K{} {} {}",
                before.dimmed(),
                current.black().on_yellow().bold(),
                after.dimmed()
            ),
            None => "\r\x1b[2K".to_string(),
        };
        drop(words);

        self.write(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn window_in_the_middle() {
        let w = words("a b c d e f g");
        let (before, current, after) = window(&w, 3, 2).unwrap();
        assert_eq!(before, "b c");
        assert_eq!(current, "d");
        assert_eq!(after, "e f");
    }

    #[test]
    fn window_clamps_at_edges() {
        let w = words("one two three");
        let (before, current, after) = window(&w, 0, 5).unwrap();
        assert_eq!(before, "");
        assert_eq!(current, "one");
        assert_eq!(after, "two three");

        let (before, _, after) = window(&w, 2, 5).unwrap();
        assert_eq!(before, "one two");
        assert_eq!(after, "");
    }

    #[test]
    fn window_out_of_range_is_none() {
        assert!(window(&words("one"), 4, 2).is_none());
    }

    #[test]
    fn reader_accepts_text_and_highlight() {
        let reader = TerminalReader::new();
        let tokens = vec![RenderedToken::new(0, "Hello"), RenderedToken::new(1, "world")];
        reader.show_text(&tokens).unwrap();
        reader.set_highlight(Some(1)).unwrap();
        reader.set_highlight(None).unwrap();
    }
}
