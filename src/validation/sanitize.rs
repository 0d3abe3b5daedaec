//! Segment text sanitization

/// Longest text kept after sanitization, in characters
pub const MAX_TEXT_LENGTH: usize = 100;

/// Characters removed from segment text
const STRIPPED_CHARS: [char; 5] = ['<', '>', '\'', '"', '&'];

/// Cleans segment text for display
///
/// Removes markup-sensitive characters (`<`, `>`, `'`, `"`, `&`), collapses
/// every whitespace run into a single space, trims both ends and truncates the
/// result to [`MAX_TEXT_LENGTH`] characters.
///
/// # Example
///
/// ```rust
/// use prize_wheel::validation::sanitize_text;
///
/// assert_eq!(sanitize_text("  Hello   <b>World</b>  "), "Hello bWorld/b");
/// assert_eq!(sanitize_text("Fish & Chips"), "Fish Chips");
/// ```
pub fn sanitize_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();

    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TEXT_LENGTH)
        .collect()
}
