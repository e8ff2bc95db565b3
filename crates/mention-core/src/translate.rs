//! Position Translator: mapping display-form offsets into the data-form buffer.
//!
//! Display names have arbitrary length, so the display text and the
//! canonical buffer drift apart positionally ("skew"). This module is the
//! single place that skew is resolved - every other component converts
//! through [`translate`] instead of doing its own offset arithmetic across
//! the two coordinate spaces.

use crate::directory::UserDirectory;
use crate::text;
use crate::token::{self, MentionToken};
use thiserror::Error;

/// Full extent of one mention token in data-form character offsets, half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionSpan {
    /// Inclusive start.
    pub start: usize,
    /// Exclusive end.
    pub end: usize,
}

impl From<&MentionToken> for MentionSpan {
    fn from(tok: &MentionToken) -> Self {
        Self {
            start: tok.start,
            end: tok.end,
        }
    }
}

/// Result of mapping one display-form offset into the data-form buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    /// The corresponding data-form character offset.
    ///
    /// When the display offset falls inside a mention this is a
    /// deterministic interior position (floor interpolation) that exists
    /// only so the mapping is total; editing callers must snap to the
    /// [`MentionSpan`] boundaries instead of splicing here.
    pub data_offset: usize,
    /// The covering mention's full data-form span, when the display offset
    /// falls within - or at the trailing boundary of - a mention expansion.
    pub mention: Option<MentionSpan>,
}

impl Translation {
    /// Whether the display offset fell inside a mention expansion.
    pub fn is_inside_mention(&self) -> bool {
        self.mention.is_some()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Offset contract violations. These are programming errors on the caller's
/// side and are never silently clamped.
pub enum OffsetError {
    #[error("display offset {offset} is out of range for display length {display_len}")]
    /// The display offset lies beyond the end of the display text.
    OutOfRange {
        /// The offending display offset.
        offset: usize,
        /// The display-form length of the buffer.
        display_len: usize,
    },
}

/// Map `display_offset` to data-form coordinates.
///
/// Walks the buffer's mention tokens left to right, accumulating consumed
/// length in both coordinate spaces:
///
/// - an offset strictly before a token's display start carries over 1:1
///   through the plain-text prefix;
/// - an offset within (or at the trailing boundary of) a token's display
///   expansion reports the token's full span; the interior `data_offset` is
///   the floor of the display-ratio interpolation onto the token's data
///   length;
/// - past the last token, the remainder carries over 1:1.
///
/// An offset beyond the display length is a contract violation.
pub fn translate(
    data: &str,
    directory: &dyn UserDirectory,
    display_offset: usize,
) -> Result<Translation, OffsetError> {
    let mut display_consumed = 0usize;
    let mut data_consumed = 0usize;

    for tok in token::scan_tokens(data) {
        let plain_len = tok.start - data_consumed;
        if display_offset < display_consumed + plain_len {
            return Ok(Translation {
                data_offset: data_consumed + (display_offset - display_consumed),
                mention: None,
            });
        }
        display_consumed += plain_len;
        data_consumed = tok.start;

        let expansion_len = text::char_len(&tok.display_form(directory));
        if display_offset <= display_consumed + expansion_len {
            let offset_in_expansion = display_offset - display_consumed;
            // Never zero: an expansion is at least "@" plus the raw token fallback.
            let interior = offset_in_expansion * tok.data_len() / expansion_len;
            return Ok(Translation {
                data_offset: tok.start + interior,
                mention: Some(MentionSpan::from(&tok)),
            });
        }
        display_consumed += expansion_len;
        data_consumed = tok.end;
    }

    let data_remaining = text::char_len(data) - data_consumed;
    let display_len = display_consumed + data_remaining;
    if display_offset > display_len {
        return Err(OffsetError::OutOfRange {
            offset: display_offset,
            display_len,
        });
    }
    Ok(Translation {
        data_offset: data_consumed + (display_offset - display_consumed),
        mention: None,
    })
}
