//! Editing helpers for the post composer.
//!
//! Offsets are byte offsets into the UTF-8 draft and must fall on character
//! boundaries.

use std::ops::Range;

use thiserror::Error;

use crate::sanitize::sanitize;
use crate::tags::{PairedTag, TagKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("selection {start}..{end} is out of bounds for a draft of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("selection start {start} is after its end {end}")]
    Inverted { start: usize, end: usize },

    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("draft is empty")]
    EmptyDraft,
}

/// A selected range of the draft. `start == end` is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    fn validate(self, text: &str) -> Result<(), EditError> {
        let Selection { start, end } = self;
        if start > end {
            return Err(EditError::Inverted { start, end });
        }
        if end > text.len() {
            return Err(EditError::OutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        for offset in [start, end] {
            if !text.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }
}

/// The result of an edit: the new draft text and where the cursor goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub cursor: usize,
}

/// Wrap the selection in a tag's markers, or insert them at the cursor.
///
/// The cursor ends up after the wrapped text, before the close marker, so
/// further typing lands inside the tag body. Nesting is not checked.
pub fn insert_tag(text: &str, selection: Selection, kind: TagKind) -> Result<Edit, EditError> {
    selection.validate(text)?;

    let before = &text[..selection.start];
    let middle = &text[selection.start..selection.end];
    let after = &text[selection.end..];
    let open = kind.open_marker();
    let close = kind.close_marker();

    let mut out = String::with_capacity(text.len() + open.len() + close.len());
    out.push_str(before);
    out.push_str(open);
    out.push_str(middle);
    out.push_str(close);
    out.push_str(after);

    Ok(Edit {
        text: out,
        cursor: before.len() + open.len() + middle.len(),
    })
}

/// Find the complete tag span a backspace at `cursor` should delete.
///
/// For each paired tag in declaration order, looks for the nearest open
/// token starting before the cursor and the nearest close token at or after
/// it. The first tag for which both exist wins, even if a later tag's span
/// would be tighter.
pub fn block_at_cursor(text: &str, cursor: usize) -> Option<Range<usize>> {
    if cursor == 0 || cursor > text.len() || !text.is_char_boundary(cursor) {
        return None;
    }

    PairedTag::ALL.iter().find_map(|tag| {
        let start = text
            .match_indices(tag.open())
            .map(|(i, _)| i)
            .take_while(|&i| i < cursor)
            .last()?;
        let end = text[cursor..].find(tag.close())? + cursor + tag.close().len();
        (cursor > start && cursor <= end).then_some(start..end)
    })
}

/// Delete the whole tag span around the cursor.
///
/// `None` means no span applies and the host should do its normal
/// single-character backspace.
pub fn backspace(text: &str, cursor: usize) -> Option<Edit> {
    let span = block_at_cursor(text, cursor)?;
    let mut out = String::with_capacity(text.len() - span.len());
    out.push_str(&text[..span.start]);
    out.push_str(&text[span.end..]);
    Some(Edit {
        text: out,
        cursor: span.start,
    })
}

/// An in-progress post body and its cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
    cursor: usize,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text-change event from the host field. The new text is sanitized.
    pub fn replace(&mut self, text: &str) {
        self.text = sanitize(text);
        self.cursor = floor_char_boundary(&self.text, self.cursor);
    }

    pub fn set_cursor(&mut self, cursor: usize) -> Result<(), EditError> {
        Selection::caret(cursor).validate(&self.text)?;
        self.cursor = cursor;
        Ok(())
    }

    pub fn insert_tag(&mut self, selection: Selection, kind: TagKind) -> Result<(), EditError> {
        let edit = insert_tag(&self.text, selection, kind)?;
        self.apply(edit);
        Ok(())
    }

    /// Returns `true` if a whole tag span was deleted.
    pub fn backspace(&mut self) -> bool {
        match backspace(&self.text, self.cursor) {
            Some(edit) => {
                self.apply(edit);
                true
            }
            None => false,
        }
    }

    /// Freeze the draft for submission.
    pub fn submit(&self) -> Result<String, EditError> {
        if self.text.trim().is_empty() {
            return Err(EditError::EmptyDraft);
        }
        Ok(self.text.clone())
    }

    fn apply(&mut self, edit: Edit) {
        self.text = edit.text;
        self.cursor = edit.cursor;
    }
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
