//! Composer session: an event-driven wrapper over the edit engine.
//!
//! [`Composer`] owns one canonical buffer, the display-form caret, and the
//! ephemeral search state of an in-progress mention query. The input
//! surface feeds it discrete [`ComposerCommand`] events (all offsets in
//! display-form coordinates at the moment of the event); after each one the
//! session exposes the derived [`RenderState`] for painting and the
//! canonical buffer for submission.
//!
//! The search state's lifecycle follows the trigger scanner exactly:
//! created when a live `@query` appears behind the caret, rebuilt on every
//! buffer or caret change, destroyed on selection, cancellation, or trigger
//! loss. Everything here is synchronous; callers that resolve candidates
//! asynchronously must discard responses whose generation (the
//! `trigger_offset`) no longer matches the live search.

use crate::codec::to_display;
use crate::directory::{User, UserDirectory};
use crate::edit::{self, EditError};
use crate::text;
use crate::translate::OffsetError;
use crate::trigger::{self, TriggerPolicy};

/// Default cap on the number of dropdown candidates kept per query.
pub const DEFAULT_RESULT_CAP: usize = 10;

/// Ephemeral state of an in-progress mention search. Never part of the
/// buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// The query text after the `@`.
    pub query: String,
    /// Display-form offset of the triggering `@`.
    ///
    /// Doubles as the search generation: an asynchronous lookup response
    /// belonging to a different trigger offset is stale and must be
    /// discarded by the caller.
    pub trigger_offset: usize,
    /// Candidate users, capped at the session's result cap.
    pub results: Vec<User>,
    /// Index of the highlighted candidate within `results`.
    pub selected: usize,
}

/// Edit intents and search-navigation events produced by an input surface.
///
/// All offsets are display-form character offsets at the moment of the
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerCommand {
    /// A printable character was typed at the given caret position.
    CharacterTyped {
        /// The typed character.
        ch: char,
        /// Caret position when the key was pressed.
        cursor: usize,
    },
    /// A candidate was chosen for the live mention query. Ignored when no
    /// search is live.
    MentionChosen {
        /// The chosen user.
        user: User,
    },
    /// A range was deleted; `start == end` is a caret backspace.
    RangeDeleted {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
    },
    /// The caret moved without an edit (click, arrow key).
    CursorMoved {
        /// The new caret position.
        cursor: usize,
    },
    /// Dropdown selection moved up.
    SelectionMovedUp,
    /// Dropdown selection moved down.
    SelectionMovedDown,
    /// The live search was dismissed (Escape).
    SearchCancelled,
}

/// Snapshot handed to the rendering layer after every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    /// The derived display text.
    pub display_text: String,
    /// Caret position, in display-form character offsets.
    pub cursor: usize,
}

/// A mention-aware composer session owning one canonical buffer.
#[derive(Debug, Clone)]
pub struct Composer<D: UserDirectory> {
    directory: D,
    data: String,
    cursor: usize,
    search: Option<SearchState>,
    policy: TriggerPolicy,
    result_cap: usize,
}

impl<D: UserDirectory> Composer<D> {
    /// Create an empty session over `directory`.
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            data: String::new(),
            cursor: 0,
            search: None,
            policy: TriggerPolicy::default(),
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    /// Create a session primed with an existing canonical buffer; the caret
    /// starts at the end of the display text.
    pub fn with_data(directory: D, data: impl Into<String>) -> Self {
        let mut session = Self::new(directory);
        session.data = data.into();
        session.cursor = text::char_len(&to_display(&session.data, &session.directory));
        session
    }

    /// Select the trigger policy (builder style).
    pub fn with_policy(mut self, policy: TriggerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cap the number of candidates kept in the search state.
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap;
        self
    }

    /// The canonical buffer - the wire form handed to backends.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Current caret position, in display-form character offsets.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The live mention search, if any.
    pub fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    /// The candidate currently highlighted in the dropdown, if any.
    pub fn selected_user(&self) -> Option<&User> {
        let search = self.search.as_ref()?;
        search.results.get(search.selected)
    }

    /// Snapshot for the rendering layer.
    pub fn render(&self) -> RenderState {
        RenderState {
            display_text: to_display(&self.data, &self.directory),
            cursor: self.cursor,
        }
    }

    /// Apply one command.
    ///
    /// Contract violations (out-of-range offsets, inverted ranges)
    /// propagate; data-quality issues never do.
    pub fn apply(&mut self, command: ComposerCommand) -> Result<(), EditError> {
        match command {
            ComposerCommand::CharacterTyped { ch, cursor } => {
                let outcome = edit::insert_char(&self.data, &self.directory, ch, cursor)?;
                self.data = outcome.data;
                self.cursor = outcome.cursor;
                self.refresh_search();
            }
            ComposerCommand::MentionChosen { user } => {
                let Some(search) = self.search.take() else {
                    return Ok(());
                };
                let outcome = edit::insert_mention(
                    &self.data,
                    &self.directory,
                    &user,
                    search.trigger_offset,
                    self.cursor,
                )?;
                self.data = outcome.data;
                self.cursor = outcome.cursor;
                // Deliberately no re-scan: the freshly inserted expansion
                // would itself read as a live `@DisplayName` query.
            }
            ComposerCommand::RangeDeleted { start, end } => {
                let outcome = edit::delete_range(&self.data, &self.directory, start, end)?;
                self.data = outcome.data;
                self.cursor = outcome.cursor;
                self.refresh_search();
            }
            ComposerCommand::CursorMoved { cursor } => {
                let display_len = text::char_len(&to_display(&self.data, &self.directory));
                if cursor > display_len {
                    return Err(OffsetError::OutOfRange {
                        offset: cursor,
                        display_len,
                    }
                    .into());
                }
                self.cursor = cursor;
                self.refresh_search();
            }
            ComposerCommand::SelectionMovedUp => {
                if let Some(search) = self.search.as_mut() {
                    search.selected = search.selected.saturating_sub(1);
                }
            }
            ComposerCommand::SelectionMovedDown => {
                if let Some(search) = self.search.as_mut() {
                    if !search.results.is_empty() {
                        search.selected = (search.selected + 1).min(search.results.len() - 1);
                    }
                }
            }
            ComposerCommand::SearchCancelled => {
                self.search = None;
            }
        }
        Ok(())
    }

    fn refresh_search(&mut self) {
        let display = to_display(&self.data, &self.directory);
        let Some(found) = trigger::scan(&display, self.cursor, self.policy) else {
            self.search = None;
            return;
        };

        let mut results = self.directory.search(&found.query);
        results.truncate(self.result_cap);
        // Keep the highlighted row across keystrokes only while the query
        // is unchanged; a new or edited query resets it.
        let selected = match &self.search {
            Some(previous)
                if previous.trigger_offset == found.offset && previous.query == found.query =>
            {
                previous.selected.min(results.len().saturating_sub(1))
            }
            _ => 0,
        };
        self.search = Some(SearchState {
            query: found.query,
            trigger_offset: found.offset,
            results,
            selected,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticDirectory;

    fn directory() -> StaticDirectory {
        StaticDirectory::new(vec![
            User::new("user_001", "alice_johnson", "Alice", "https://example.com/a.png"),
            User::new("user_002", "bob_smith", "Bob", "https://example.com/b.png"),
            User::new("user_003", "charlie_brown", "Charlie", "https://example.com/c.png"),
        ])
    }

    fn type_text(composer: &mut Composer<StaticDirectory>, input: &str) {
        for ch in input.chars() {
            let cursor = composer.cursor();
            composer
                .apply(ComposerCommand::CharacterTyped { ch, cursor })
                .unwrap();
        }
    }

    #[test]
    fn test_typing_updates_buffer_and_cursor() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hello");
        assert_eq!(composer.data(), "hello");
        assert_eq!(composer.cursor(), 5);
        assert!(composer.search().is_none());
    }

    #[test]
    fn test_trigger_opens_and_narrows_search() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hi @");
        let search = composer.search().unwrap();
        assert_eq!(search.query, "");
        assert_eq!(search.trigger_offset, 3);
        assert_eq!(search.results.len(), 3);

        type_text(&mut composer, "ch");
        let search = composer.search().unwrap();
        assert_eq!(search.query, "ch");
        let ids: Vec<_> = search.results.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["user_003"]);
    }

    #[test]
    fn test_choosing_inserts_token_and_clears_search() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hi @bo");
        let user = composer.selected_user().cloned().unwrap();
        composer
            .apply(ComposerCommand::MentionChosen { user })
            .unwrap();
        assert_eq!(composer.data(), "hi <@user_002>");
        assert_eq!(composer.render().display_text, "hi @Bob");
        assert_eq!(composer.cursor(), 7);
        assert!(composer.search().is_none());
    }

    #[test]
    fn test_choosing_without_live_search_is_a_noop() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hi");
        composer
            .apply(ComposerCommand::MentionChosen {
                user: User::new("user_001", "alice_johnson", "Alice", ""),
            })
            .unwrap();
        assert_eq!(composer.data(), "hi");
    }

    #[test]
    fn test_whitespace_destroys_search() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hi @al");
        assert!(composer.search().is_some());
        type_text(&mut composer, " ");
        assert!(composer.search().is_none());
    }

    #[test]
    fn test_cursor_move_away_destroys_search() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hi @al");
        composer
            .apply(ComposerCommand::CursorMoved { cursor: 1 })
            .unwrap();
        assert!(composer.search().is_none());
        // Moving back re-detects the same trigger from scratch.
        composer
            .apply(ComposerCommand::CursorMoved { cursor: 6 })
            .unwrap();
        assert_eq!(composer.search().unwrap().query, "al");
    }

    #[test]
    fn test_selection_navigation_clamps() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "@");
        assert_eq!(composer.search().unwrap().results.len(), 3);

        composer.apply(ComposerCommand::SelectionMovedUp).unwrap();
        assert_eq!(composer.search().unwrap().selected, 0);
        for _ in 0..5 {
            composer.apply(ComposerCommand::SelectionMovedDown).unwrap();
        }
        assert_eq!(composer.search().unwrap().selected, 2);
        assert_eq!(composer.selected_user().unwrap().id, "user_003");
    }

    #[test]
    fn test_selection_resets_when_query_changes() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "@");
        composer.apply(ComposerCommand::SelectionMovedDown).unwrap();
        assert_eq!(composer.search().unwrap().selected, 1);
        type_text(&mut composer, "b");
        assert_eq!(composer.search().unwrap().selected, 0);
    }

    #[test]
    fn test_cancel_destroys_search() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "@al");
        composer.apply(ComposerCommand::SearchCancelled).unwrap();
        assert!(composer.search().is_none());
        assert_eq!(composer.data(), "@al");
    }

    #[test]
    fn test_backspace_through_mention_is_atomic() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hi @bo");
        let user = composer.selected_user().cloned().unwrap();
        composer
            .apply(ComposerCommand::MentionChosen { user })
            .unwrap();
        assert_eq!(composer.data(), "hi <@user_002>");

        let cursor = composer.cursor();
        composer
            .apply(ComposerCommand::RangeDeleted {
                start: cursor,
                end: cursor,
            })
            .unwrap();
        assert_eq!(composer.data(), "hi ");
        assert_eq!(composer.cursor(), 3);
    }

    #[test]
    fn test_result_cap() {
        let mut many = Vec::new();
        for i in 0..15 {
            many.push(User::new(
                format!("user_{i:03}"),
                format!("user{i}"),
                format!("User{i}"),
                "",
            ));
        }
        let mut composer = Composer::new(StaticDirectory::new(many));
        type_text(&mut composer, "@user");
        assert_eq!(composer.search().unwrap().results.len(), DEFAULT_RESULT_CAP);

        let mut capped = Composer::new(directory()).with_result_cap(1);
        type_text(&mut capped, "@");
        assert_eq!(capped.search().unwrap().results.len(), 1);
    }

    #[test]
    fn test_with_data_starts_at_display_end() {
        let composer = Composer::with_data(directory(), "<@user_001> hi");
        assert_eq!(composer.render().display_text, "@Alice hi");
        assert_eq!(composer.cursor(), 9);
    }

    #[test]
    fn test_any_position_policy_is_honored() {
        let mut composer = Composer::new(directory()).with_policy(TriggerPolicy::AnyPosition);
        type_text(&mut composer, "mail@al");
        assert_eq!(composer.search().unwrap().query, "al");

        let mut strict = Composer::new(directory());
        type_text(&mut strict, "mail@al");
        assert!(strict.search().is_none());
    }

    #[test]
    fn test_out_of_range_cursor_move_fails_fast() {
        let mut composer = Composer::new(directory());
        type_text(&mut composer, "hi");
        let err = composer
            .apply(ComposerCommand::CursorMoved { cursor: 3 })
            .unwrap_err();
        assert!(matches!(err, EditError::Offset(_)));
        assert_eq!(composer.cursor(), 2);
    }
}
