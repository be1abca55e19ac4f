//! Buffer Store: per-slot text plus cursor.
//!
//! Cursor offsets are UTF-16 code units, which is what browser editors
//! report through `selectionStart`. They are converted to byte indices only
//! when text is inserted.

use super::{Slot, Starter};

/// Editing state for one slot. Kept across tab switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotModel {
    text: String,
    /// Caret position in UTF-16 code units, always within the text.
    cursor: usize,
}

impl SlotModel {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the content. The cursor is kept (clamped) unless given.
    pub fn replace(&mut self, text: String, cursor: Option<usize>) {
        self.text = text;
        self.set_cursor(cursor.unwrap_or(self.cursor));
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(utf16_len(&self.text));
    }

    /// Insert text at the caret and move the caret past it.
    pub fn insert_at_cursor(&mut self, insert: &str) {
        let at = byte_index(&self.text, self.cursor);
        self.text.insert_str(at, insert);
        self.cursor += utf16_len(insert);
    }
}

/// The three buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferStore {
    slots: [SlotModel; 3],
}

impl BufferStore {
    pub fn from_starter(starter: &Starter) -> Self {
        Self {
            slots: Slot::ALL.map(|slot| SlotModel::new(starter.get(slot))),
        }
    }

    pub fn get(&self, slot: Slot) -> &SlotModel {
        &self.slots[slot.index()]
    }

    pub fn text(&self, slot: Slot) -> &str {
        self.get(slot).text()
    }

    /// Replace a buffer unconditionally. Content is never validated.
    pub fn set(&mut self, slot: Slot, text: String, cursor: Option<usize>) {
        self.slots[slot.index()].replace(text, cursor);
    }

    pub fn set_cursor(&mut self, slot: Slot, offset: usize) {
        self.slots[slot.index()].set_cursor(offset);
    }

    pub fn insert_at_cursor(&mut self, slot: Slot, text: &str) {
        self.slots[slot.index()].insert_at_cursor(text);
    }

    /// Restore all buffers to the starter set; cursors go back to the start.
    pub fn reset(&mut self, starter: &Starter) {
        *self = Self::from_starter(starter);
    }
}

fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index for a UTF-16 offset, snapped to the enclosing char boundary.
fn byte_index(s: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (i, c) in s.char_indices() {
        if units >= utf16_offset {
            return i;
        }
        units += c.len_utf16();
    }
    s.len()
}
