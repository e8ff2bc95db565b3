//! Mention Codec: wholesale conversion between data form and display form.
//!
//! Conversion runs in one left-to-right pass that appends to a fresh
//! string, so an earlier substitution can never shift the offsets still
//! needed by a later one. Unresolvable identifiers pass through literally -
//! fail-soft, not fail-fast - so malformed or stale references render as
//! raw markup instead of corrupting the buffer.

use crate::directory::UserDirectory;
use crate::text;
use crate::token;

/// A mention recovered by [`parse`], positioned in the derived display text
/// (character offsets, half-open).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMention {
    /// The referenced user identifier.
    pub user_id: String,
    /// The display name substituted for the token.
    pub display_name: String,
    /// Inclusive start offset in the display text.
    pub start: usize,
    /// Exclusive end offset in the display text.
    pub end: usize,
}

/// Derive the display form of a data buffer.
///
/// Every `<@ID>` whose identifier resolves becomes `@DisplayName`;
/// unresolved tokens pass through unchanged.
pub fn to_display(data: &str, directory: &dyn UserDirectory) -> String {
    let mut display = String::with_capacity(data.len());
    let mut data_consumed = 0usize;
    for tok in token::scan_tokens(data) {
        display.push_str(text::char_slice(data, data_consumed, tok.start));
        display.push_str(&tok.display_form(directory));
        data_consumed = tok.end;
    }
    display.push_str(text::char_slice(data, data_consumed, text::char_len(data)));
    display
}

/// Reverse parse for initial-load scenarios: the derived display text plus
/// the mention records recovered from the buffer, with their display-form
/// spans.
///
/// Unresolvable tokens render literally and yield no record.
pub fn parse(data: &str, directory: &dyn UserDirectory) -> (String, Vec<DisplayMention>) {
    let mut display = String::with_capacity(data.len());
    let mut display_len = 0usize;
    let mut data_consumed = 0usize;
    let mut mentions = Vec::new();

    for tok in token::scan_tokens(data) {
        let plain = text::char_slice(data, data_consumed, tok.start);
        display.push_str(plain);
        display_len += text::char_len(plain);

        match directory.resolve(&tok.user_id) {
            Some(user) => {
                let expansion = format!("@{}", user.display_name);
                let expansion_len = text::char_len(&expansion);
                mentions.push(DisplayMention {
                    user_id: tok.user_id.clone(),
                    display_name: user.display_name,
                    start: display_len,
                    end: display_len + expansion_len,
                });
                display.push_str(&expansion);
                display_len += expansion_len;
            }
            None => {
                let raw = tok.raw();
                display.push_str(&raw);
                display_len += text::char_len(&raw);
            }
        }
        data_consumed = tok.end;
    }

    display.push_str(text::char_slice(data, data_consumed, text::char_len(data)));
    (display, mentions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{StaticDirectory, User};

    fn directory() -> StaticDirectory {
        StaticDirectory::new(vec![
            User::new("user_001", "alice_johnson", "Alice", "https://example.com/a.png"),
            User::new("user_002", "bob_smith", "Bob", "https://example.com/b.png"),
        ])
    }

    #[test]
    fn test_to_display_substitutes_resolvable_tokens() {
        let directory = directory();
        assert_eq!(to_display("<@user_001> hi", &directory), "@Alice hi");
        assert_eq!(
            to_display("<@user_001> and <@user_002>!", &directory),
            "@Alice and @Bob!"
        );
    }

    #[test]
    fn test_to_display_passes_unresolvable_tokens_through() {
        let directory = directory();
        assert_eq!(to_display("<@user_999> hi", &directory), "<@user_999> hi");
        assert_eq!(
            to_display("<@user_001> vs <@user_999>", &directory),
            "@Alice vs <@user_999>"
        );
    }

    #[test]
    fn test_to_display_plain_text_is_untouched() {
        let directory = directory();
        assert_eq!(to_display("", &directory), "");
        assert_eq!(to_display("no mentions here", &directory), "no mentions here");
        // A lone "@word" is display-form syntax, not a data token.
        assert_eq!(to_display("@Alice", &directory), "@Alice");
    }

    #[test]
    fn test_parse_recovers_display_spans() {
        let directory = directory();
        let (display, mentions) = parse("hi <@user_001>, ping <@user_002>", &directory);
        assert_eq!(display, "hi @Alice, ping @Bob");
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].user_id, "user_001");
        assert_eq!((mentions[0].start, mentions[0].end), (3, 9));
        assert_eq!(mentions[1].display_name, "Bob");
        assert_eq!((mentions[1].start, mentions[1].end), (16, 20));
    }

    #[test]
    fn test_parse_skips_unresolvable_tokens() {
        let directory = directory();
        let (display, mentions) = parse("<@user_999> <@user_001>", &directory);
        assert_eq!(display, "<@user_999> @Alice");
        assert_eq!(mentions.len(), 1);
        assert_eq!((mentions[0].start, mentions[0].end), (12, 18));
    }

    #[test]
    fn test_round_trip_is_stable() {
        let directory = directory();
        let display = to_display("<@user_001> hi <@user_002>", &directory);
        // Display text contains no data-form tokens, so re-deriving is a no-op.
        assert_eq!(to_display(&display, &directory), display);
    }
}
