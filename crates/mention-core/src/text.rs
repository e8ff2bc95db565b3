//! Character-offset helpers shared by the engine modules.
//!
//! Public engine APIs speak character offsets; byte/char conversion happens
//! here, at the `&str` boundary, and nowhere else.

/// Number of characters in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `char_offset`-th character, saturating at the end.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Character offset of the character starting at `byte` (which must lie on a
/// character boundary, as regex match positions do).
pub(crate) fn char_offset_at(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// Slice `text` by a half-open character range.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);
    &text[start_byte..end_byte]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_offsets() {
        assert_eq!(char_len("hello"), 5);
        assert_eq!(byte_offset("hello", 2), 2);
        assert_eq!(char_offset_at("hello", 3), 3);
        assert_eq!(char_slice("hello", 1, 4), "ell");
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "héllo 你好";
        assert_eq!(char_len(text), 8);
        assert_eq!(byte_offset(text, 1), 1);
        assert_eq!(byte_offset(text, 2), 3); // 'é' is two bytes
        assert_eq!(char_slice(text, 6, 8), "你好");
        assert_eq!(char_offset_at(text, byte_offset(text, 7)), 7);
    }

    #[test]
    fn test_saturation_past_end() {
        assert_eq!(byte_offset("ab", 10), 2);
        assert_eq!(char_slice("ab", 1, 10), "b");
    }
}
