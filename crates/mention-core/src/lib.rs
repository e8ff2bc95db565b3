#![warn(missing_docs)]
//! Mention Core - Headless Mention-Aware Text Engine
//!
//! # Overview
//!
//! `mention-core` keeps two synchronized representations of one piece of user-typed text:
//!
//! - **display form** - what a human reads, mentions appear as `@Alice`
//! - **data form** - the canonical buffer, safe to store and transmit, mentions appear as `<@user_001>`
//!
//! The canonical buffer is the single source of truth; display text is always derived from it.
//! Because display names have arbitrary length (and can collide), the two forms are not
//! position-isomorphic - the engine's job is to resolve that skew and to keep every mention
//! atomic under editing.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Composer Session (commands + search state) │  ← Event-driven API
//! ├─────────────────────────────────────────────┤
//! │  Edit Engine (char / mention / delete)      │  ← Mutations
//! ├─────────────────────────────────────────────┤
//! │  Position Translator │ Trigger Scanner      │  ← Coordinate mapping & `@query` detection
//! ├─────────────────────────────────────────────┤
//! │  Mention Codec (data ↔ display)             │  ← Wholesale conversion
//! ├─────────────────────────────────────────────┤
//! │  Token Grammar (`<@ID>`)                    │  ← Canonical buffer scan
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All public offsets are **character offsets** (never bytes), ranges are half-open
//! `[start, end)`. The user directory is an injected capability ([`UserDirectory`]), never
//! global state.
//!
//! # Quick Start
//!
//! ## Using the Composer Session
//!
//! ```rust
//! use mention_core::{Composer, ComposerCommand, StaticDirectory, User};
//!
//! let directory = StaticDirectory::new(vec![User::new(
//!     "user_001",
//!     "alice_johnson",
//!     "Alice",
//!     "https://example.com/alice.png",
//! )]);
//! let mut composer = Composer::new(directory);
//!
//! // Type "hi @al" one key at a time.
//! for (i, ch) in "hi @al".chars().enumerate() {
//!     composer
//!         .apply(ComposerCommand::CharacterTyped { ch, cursor: i })
//!         .unwrap();
//! }
//!
//! // The trigger scanner has detected the live query "al".
//! let candidate = composer.selected_user().cloned().expect("a live candidate");
//! composer
//!     .apply(ComposerCommand::MentionChosen { user: candidate })
//!     .unwrap();
//!
//! assert_eq!(composer.data(), "hi <@user_001>");
//! assert_eq!(composer.render().display_text, "hi @Alice");
//! ```
//!
//! ## Using the Engine Functions Directly
//!
//! ```rust
//! use mention_core::{to_display, translate, StaticDirectory, User};
//!
//! let directory = StaticDirectory::new(vec![User::new(
//!     "user_001",
//!     "alice_johnson",
//!     "Alice",
//!     "https://example.com/alice.png",
//! )]);
//!
//! assert_eq!(to_display("<@user_001> hi", &directory), "@Alice hi");
//!
//! // Display offset 8 sits inside "hi" - plain text maps 1:1 past the token.
//! let t = translate("<@user_001> hi", &directory, 8).unwrap();
//! assert_eq!(t.data_offset, 13);
//! assert!(!t.is_inside_mention());
//! ```
//!
//! # Failure Policy
//!
//! - **Contract violations** (out-of-range offsets, inverted ranges) fail fast as
//!   [`OffsetError`] / [`EditError`] - never clamped.
//! - **Data-quality issues** (a token whose user id no longer resolves) fail soft: the token
//!   renders literally and stays atomic; nothing is ever dropped or panics.
//!
//! # Module Description
//!
//! - [`token`] - the `<@ID>` token grammar over the canonical buffer
//! - [`directory`] - the injected user lookup capability
//! - [`translate`] - display→data offset mapping (the only place skew is resolved)
//! - [`codec`] - wholesale data ↔ display conversion
//! - [`edit`] - the three atomic edit operations
//! - [`trigger`] - backward-scanning `@query` detection
//! - [`session`] - event-driven composer wrapping all of the above

pub mod codec;
pub mod directory;
pub mod edit;
pub mod session;
pub mod token;
pub mod translate;
pub mod trigger;
mod text;

pub use codec::{DisplayMention, parse, to_display};
pub use directory::{StaticDirectory, User, UserDirectory};
pub use edit::{EditError, EditOutcome, delete_range, insert_char, insert_mention};
pub use session::{Composer, ComposerCommand, RenderState, SearchState};
pub use token::{MentionToken, format_token, scan_tokens};
pub use translate::{MentionSpan, OffsetError, Translation, translate};
pub use trigger::{Trigger, TriggerPolicy, scan};
