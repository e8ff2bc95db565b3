//! Edit Engine: the three mutating operations over the canonical buffer.
//!
//! Every operation consumes display-form character offsets (as reported by
//! the input surface), goes through the Position Translator, and returns
//! the updated canonical buffer together with the resulting display-form
//! caret. Mentions are atomic throughout: no operation can leave a
//! partially consumed token in either representation.

use crate::codec::to_display;
use crate::directory::{User, UserDirectory};
use crate::text;
use crate::token::format_token;
use crate::translate::{OffsetError, translate};
use thiserror::Error;

/// Outcome of an edit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The updated canonical (data form) buffer.
    pub data: String,
    /// The resulting caret position, in display-form character offsets.
    pub cursor: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Contract violations for edit operations. Data-quality issues (stale user
/// ids) are absorbed internally and never surface here.
pub enum EditError {
    #[error(transparent)]
    /// A display offset lay outside the buffer.
    Offset(#[from] OffsetError),

    #[error("invalid display range {start}..{end}")]
    /// A range whose start lies after its end.
    InvalidRange {
        /// Range start (display offset).
        start: usize,
        /// Range end (display offset).
        end: usize,
    },
}

fn display_len_of(data: &str, directory: &dyn UserDirectory) -> usize {
    text::char_len(&to_display(data, directory))
}

/// Splice one character into the buffer at a display-form offset.
///
/// An offset inside a mention snaps to a token boundary rather than
/// splicing mid-token: the leading boundary stays in front of the token,
/// every other interior offset lands after it. The resulting caret is the
/// display length of the expanded buffer up to and including the new
/// character.
pub fn insert_char(
    data: &str,
    directory: &dyn UserDirectory,
    ch: char,
    display_offset: usize,
) -> Result<EditOutcome, EditError> {
    let translation = translate(data, directory, display_offset)?;
    let at = match translation.mention {
        Some(span) if translation.data_offset == span.start => span.start,
        Some(span) => span.end,
        None => translation.data_offset,
    };

    let at_byte = text::byte_offset(data, at);
    let mut new_data = String::with_capacity(data.len() + ch.len_utf8());
    new_data.push_str(&data[..at_byte]);
    new_data.push(ch);
    new_data.push_str(&data[at_byte..]);

    let cursor = display_len_of(text::char_slice(&new_data, 0, at + 1), directory);
    Ok(EditOutcome {
        data: new_data,
        cursor,
    })
}

/// Replace the display span between the trigger and the caret with a
/// mention token for `user`.
///
/// A single-space separator is enforced toward any adjacent non-whitespace
/// character on either side, so a mention never fuses with a neighboring
/// word; buffer boundaries need no separator. The resulting caret is the
/// display length of the expanded buffer up to and including the new token.
pub fn insert_mention(
    data: &str,
    directory: &dyn UserDirectory,
    user: &User,
    trigger_offset: usize,
    cursor_offset: usize,
) -> Result<EditOutcome, EditError> {
    if trigger_offset > cursor_offset {
        return Err(EditError::InvalidRange {
            start: trigger_offset,
            end: cursor_offset,
        });
    }
    let start_t = translate(data, directory, trigger_offset)?;
    let end_t = translate(data, directory, cursor_offset)?;
    // Widen outward across any touched token so it is replaced whole.
    let start = match start_t.mention {
        Some(span) => span.start,
        None => start_t.data_offset,
    };
    let end = match end_t.mention {
        Some(span) => span.end,
        None => end_t.data_offset,
    };

    let mut before = text::char_slice(data, 0, start).to_string();
    if before.chars().next_back().is_some_and(|c| !c.is_whitespace()) {
        before.push(' ');
    }
    let after = text::char_slice(data, end, text::char_len(data));
    let token = format_token(&user.id);

    let mut new_data = String::with_capacity(before.len() + token.len() + after.len() + 1);
    new_data.push_str(&before);
    new_data.push_str(&token);
    let cursor = display_len_of(&new_data, directory);
    if after.chars().next().is_some_and(|c| !c.is_whitespace()) {
        new_data.push(' ');
    }
    new_data.push_str(after);

    Ok(EditOutcome {
        data: new_data,
        cursor,
    })
}

/// Delete a display-form range.
///
/// Atomicity rule: an end that falls inside a mention widens outward to the
/// token's span boundary, so a backspace or selection that merely touches a
/// mention removes the whole token, never a fragment of its expansion. An
/// empty range after widening is a caret backspace in plain text: exactly
/// one data-form character before the caret is deleted (a no-op at the
/// start of the buffer). The resulting caret is the display length of the
/// buffer truncated at the deletion start.
pub fn delete_range(
    data: &str,
    directory: &dyn UserDirectory,
    start_offset: usize,
    end_offset: usize,
) -> Result<EditOutcome, EditError> {
    if start_offset > end_offset {
        return Err(EditError::InvalidRange {
            start: start_offset,
            end: end_offset,
        });
    }
    let start_t = translate(data, directory, start_offset)?;
    let end_t = translate(data, directory, end_offset)?;
    let mut start = match start_t.mention {
        Some(span) => span.start,
        None => start_t.data_offset,
    };
    let end = match end_t.mention {
        Some(span) => span.end,
        None => end_t.data_offset,
    };

    if start == end {
        if start == 0 {
            return Ok(EditOutcome {
                data: data.to_string(),
                cursor: 0,
            });
        }
        start -= 1;
    }

    let prefix = text::char_slice(data, 0, start);
    let cursor = display_len_of(prefix, directory);
    let mut new_data = String::with_capacity(data.len());
    new_data.push_str(prefix);
    new_data.push_str(text::char_slice(data, end, text::char_len(data)));

    Ok(EditOutcome {
        data: new_data,
        cursor,
    })
}
