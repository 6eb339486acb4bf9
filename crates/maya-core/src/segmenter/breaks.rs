//! Natural-break detection over the text accumulated for the current chunk.
//!
//! A plain suffix check: "3." or "Dr." count as breaks.

/// Emoji that close a thought when they end the buffer.
const CLOSING_EMOJI: [char; 8] = ['😊', '😄', '😃', '😀', '🤔', '💭', '💡', '🎉'];

/// True when `text` ends at a sentence end, a closing emoji, or contains a
/// paragraph break anywhere.
pub fn is_natural_break(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.ends_with(['.', '!', '?']) {
        return true;
    }

    if text
        .trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| CLOSING_EMOJI.contains(&c))
    {
        return true;
    }

    text.contains("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_endings_break() {
        assert!(is_natural_break("Hello there!"));
        assert!(is_natural_break("Are you sure?"));
        assert!(is_natural_break("Done.   "));
        assert!(!is_natural_break("Hello there"));
    }

    #[test]
    fn closing_emoji_break_with_trailing_space() {
        assert!(is_natural_break("Nice 😊"));
        assert!(is_natural_break("Party time 🎉  "));
        assert!(!is_natural_break("Sad 😢"));
        assert!(!is_natural_break("😊 then more words"));
    }

    #[test]
    fn paragraph_break_anywhere() {
        assert!(is_natural_break("line one\n\nline two"));
        assert!(!is_natural_break("line one\nline two"));
    }

    #[test]
    fn empty_and_whitespace_do_not_break() {
        assert!(!is_natural_break(""));
        assert!(!is_natural_break("   "));
    }

    #[test]
    fn naive_on_decimals_and_abbreviations() {
        assert!(is_natural_break("It costs 3."));
        assert!(is_natural_break("Ask Dr."));
        assert!(!is_natural_break("It costs 3.50"));
    }
}
