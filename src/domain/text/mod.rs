//! Reader text cleanup

/// Tidy captured text for the reader view.
///
/// Line endings are normalized, single line breaks inside a paragraph become
/// spaces, blank lines separate paragraphs, and runs of spaces or tabs
/// collapse to one space.
pub fn clean_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(join_words(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(join_words(&current));
    }

    paragraphs.join("\n\n")
}

fn join_words(lines: &[&str]) -> String {
    lines
        .iter()
        .flat_map(|line| line.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
