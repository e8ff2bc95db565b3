//! Mention-Trigger Scanner: detecting an in-progress `@query` behind the caret.
//!
//! A deliberately tiny state machine with exactly two outcomes - triggered
//! or not - re-evaluated from scratch on every keystroke. Nothing persists
//! between calls, so the scanner is trivially restartable and immune to
//! stale-state bugs.

/// Policy for which `@` characters open a mention query.
///
/// Two divergent behaviors exist in historical mention implementations;
/// the difference matters for email-like text (`name@host`). The choice is
/// an explicit, caller-selected policy rather than an accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerPolicy {
    /// An `@` counts only at the start of the text or right after
    /// whitespace; a word-embedded `@` is skipped and the scan continues
    /// left. Rejects email-like sequences, the right default for a chat
    /// composer.
    #[default]
    AfterWhitespace,
    /// Any `@` reachable from the caret without crossing whitespace counts.
    AnyPosition,
}

/// An in-progress mention query detected behind the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// The query text between the `@` and the caret.
    pub query: String,
    /// Display-form character offset of the `@` itself.
    pub offset: usize,
}

/// Scan backward from `cursor` (a display-form character offset) for a live
/// mention query.
///
/// Whitespace between the caret and the nearest eligible `@` means "not
/// triggered" - which also guarantees a returned query never contains
/// whitespace. A cursor past the end of the text never triggers.
pub fn scan(display: &str, cursor: usize, policy: TriggerPolicy) -> Option<Trigger> {
    let chars: Vec<char> = display.chars().collect();
    if cursor > chars.len() {
        return None;
    }

    let mut i = cursor;
    while i > 0 {
        let ch = chars[i - 1];
        if ch.is_whitespace() {
            return None;
        }
        if ch == '@' {
            let at = i - 1;
            let eligible = match policy {
                TriggerPolicy::AnyPosition => true,
                TriggerPolicy::AfterWhitespace => at == 0 || chars[at - 1].is_whitespace(),
            };
            if eligible {
                return Some(Trigger {
                    query: chars[at + 1..cursor].iter().collect(),
                    offset: at,
                });
            }
        }
        i -= 1;
    }
    None
}
