//! Mention token grammar over the canonical (data form) buffer.
//!
//! A mention token has the exact shape `<@` + identifier + `>`, e.g.
//! `<@user_001>`; everything else in the buffer is plain text. The display
//! expansion of a token is `@DisplayName` when the identifier resolves, and
//! the raw token text otherwise, so a stale reference renders literally
//! instead of corrupting the buffer.

use crate::directory::UserDirectory;
use crate::text;
use regex::Regex;
use std::sync::LazyLock;

// The pattern is a fixed literal, so unlike user-supplied search queries it
// is compiled exactly once.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@(\w+)>").expect("token pattern is a valid regex"));

/// A mention token found in a data-form buffer.
///
/// Offsets are character offsets into the data buffer, half-open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionToken {
    /// The referenced user identifier (the `ID` in `<@ID>`).
    pub user_id: String,
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl MentionToken {
    /// Length of the token in data-form characters.
    pub fn data_len(&self) -> usize {
        self.end - self.start
    }

    /// The raw token text, `<@ID>`.
    pub fn raw(&self) -> String {
        format_token(&self.user_id)
    }

    /// The token's display expansion: `@DisplayName` when the identifier
    /// resolves, the raw token text otherwise.
    pub fn display_form(&self, directory: &dyn UserDirectory) -> String {
        match directory.resolve(&self.user_id) {
            Some(user) => format!("@{}", user.display_name),
            None => self.raw(),
        }
    }
}

/// Render the data-form token for a user identifier.
pub fn format_token(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Find every mention token in `data`, left to right.
pub fn scan_tokens(data: &str) -> Vec<MentionToken> {
    let mut tokens = Vec::new();
    for captures in TOKEN_RE.captures_iter(data) {
        let whole = captures.get(0).expect("capture 0 is the whole match");
        let id = captures.get(1).expect("token pattern has one group");
        tokens.push(MentionToken {
            user_id: id.as_str().to_string(),
            start: text::char_offset_at(data, whole.start()),
            end: text::char_offset_at(data, whole.end()),
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{StaticDirectory, User};

    fn alice_directory() -> StaticDirectory {
        StaticDirectory::new(vec![User::new(
            "user_001",
            "alice_johnson",
            "Alice",
            "https://example.com/alice.png",
        )])
    }

    #[test]
    fn test_scan_single_token() {
        let tokens = scan_tokens("hi <@user_001>!");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].user_id, "user_001");
        assert_eq!((tokens[0].start, tokens[0].end), (3, 14));
        assert_eq!(tokens[0].data_len(), 11);
    }

    #[test]
    fn test_scan_multiple_tokens() {
        let tokens = scan_tokens("<@user_001> and <@user_002>");
        assert_eq!(tokens.len(), 2);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 11));
        assert_eq!((tokens[1].start, tokens[1].end), (16, 27));
    }

    #[test]
    fn test_malformed_tokens_are_plain_text() {
        assert!(scan_tokens("<@user_001").is_empty());
        assert!(scan_tokens("<@ user>").is_empty());
        assert!(scan_tokens("<user_001>").is_empty());
        assert!(scan_tokens("@user_001").is_empty());
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let tokens = scan_tokens("你好 <@user_001>");
        assert_eq!((tokens[0].start, tokens[0].end), (3, 14));
    }

    #[test]
    fn test_display_form() {
        let directory = alice_directory();
        let tokens = scan_tokens("<@user_001> <@user_999>");
        assert_eq!(tokens[0].display_form(&directory), "@Alice");
        // Unresolvable id falls back to the raw token text.
        assert_eq!(tokens[1].display_form(&directory), "<@user_999>");
    }

    #[test]
    fn test_format_token() {
        assert_eq!(format_token("user_042"), "<@user_042>");
    }
}
