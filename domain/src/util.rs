//! Shared utility functions.

use std::borrow::Cow;

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string; short inputs come back
/// unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate like [`truncate_str`] but mark cut strings with a trailing
/// ellipsis. Used for display, where silent truncation misleads.
pub fn ellipsize(s: &str, max_bytes: usize) -> Cow<'_, str> {
    if s.len() <= max_bytes {
        return Cow::Borrowed(s);
    }
    Cow::Owned(format!("{}...", truncate_str(s, max_bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_str("paper title here", 5), "paper");
        assert_eq!(truncate_str("hi", 10), "hi");
        assert_eq!(truncate_str("", 10), "");
    }

    #[test]
    fn test_truncate_multibyte_boundary() {
        // Each kana is 3 bytes; cutting mid-character backs up.
        let s = "研究論文";
        assert_eq!(truncate_str(s, 4), "研");
        assert_eq!(truncate_str(s, 6), "研究");
        assert_eq!(truncate_str(s, 12), s);
    }

    #[test]
    fn test_ellipsize_marks_cut() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("a very long title", 6), "a very...");
    }
}
