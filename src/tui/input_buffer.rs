//! Editable input buffer with a char-safe cursor and history navigation.

use crate::textutil::{next_boundary, prev_boundary};
use crate::tui::history::HistoryStore;

/// Text being edited plus cursor and history-navigation state.
///
/// `cursor` is a byte offset that always sits on a `char` boundary in
/// `[0, buffer.len()]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    buffer: String,
    cursor: usize,
    /// Steps back from the newest history entry while navigating.
    history_index: Option<usize>,
    /// Text to restore when navigating forward past the newest entry.
    draft: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Take the submitted text and reset all state.
    pub fn take(&mut self) -> String {
        let text = std::mem::take(&mut self.buffer);
        *self = Self::default();
        text
    }

    pub fn insert(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        self.edited();
    }

    /// Insert a literal line break; never submits.
    pub fn insert_newline(&mut self) {
        self.insert('\n');
    }

    /// Delete the char before the cursor. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = prev_boundary(&self.buffer, self.cursor);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
        self.edited();
        true
    }

    /// Delete the char under the cursor. Returns whether anything changed.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        let end = next_boundary(&self.buffer, self.cursor);
        self.buffer.replace_range(self.cursor..end, "");
        self.edited();
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor = prev_boundary(&self.buffer, self.cursor);
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        self.cursor = next_boundary(&self.buffer, self.cursor);
        true
    }

    /// Empty the buffer and leave history navigation.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_index = None;
        self.draft.clear();
    }

    /// Replace the whole text and put the cursor at the end.
    pub fn replace(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
        self.cursor = self.buffer.len();
        self.edited();
    }

    /// Step back to an older history entry.
    ///
    /// The first step saves the current text as the draft. Stepping stops at
    /// the oldest entry. Returns whether the buffer changed.
    pub fn history_prev(&mut self, history: &HistoryStore) -> bool {
        if history.is_empty() {
            return false;
        }
        let oldest = history.len() - 1;
        let next_index = match self.history_index {
            None => {
                self.draft = self.buffer.clone();
                0
            }
            Some(idx) if idx >= oldest => return false,
            Some(idx) => idx + 1,
        };
        self.show_history_entry(history, next_index);
        true
    }

    /// Step forward to a newer entry, or back to the draft past the newest.
    pub fn history_next(&mut self, history: &HistoryStore) -> bool {
        match self.history_index {
            None => false,
            Some(0) => {
                self.history_index = None;
                self.buffer = self.draft.clone();
                self.cursor = self.buffer.len();
                true
            }
            Some(idx) => {
                self.show_history_entry(history, idx - 1);
                true
            }
        }
    }

    fn show_history_entry(&mut self, history: &HistoryStore, index: usize) {
        // History may have shrunk while navigating; clamp to what exists.
        let index = index.min(history.len().saturating_sub(1));
        self.buffer = history.from_newest(index).unwrap_or_default().to_string();
        self.cursor = self.buffer.len();
        self.history_index = Some(index);
    }

    fn edited(&mut self) {
        if self.history_index.take().is_some() {
            self.draft = self.buffer.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> LineBuffer {
        let mut buf = LineBuffer::new();
        for ch in text.chars() {
            buf.insert(ch);
        }
        buf
    }

    fn history_of(entries: &[&str]) -> HistoryStore {
        let mut history = HistoryStore::default();
        for entry in entries {
            history.add(entry);
        }
        history
    }

    #[test]
    fn insert_and_backspace_at_cursor() {
        let mut buf = typed("hllo");
        for _ in 0..3 {
            buf.move_left();
        }
        buf.insert('e');
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.cursor(), 2);

        assert!(buf.backspace());
        assert_eq!(buf.text(), "hllo");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn backspace_at_start_and_delete_at_end_are_noops() {
        let mut buf = typed("ab");
        assert!(!buf.delete_forward());
        buf.move_left();
        buf.move_left();
        assert!(!buf.backspace());
        assert!(!buf.move_left());
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "b");
    }

    #[test]
    fn cursor_moves_by_char_not_byte() {
        let mut buf = typed("aé😀");
        assert_eq!(buf.cursor(), buf.text().len());
        buf.move_left();
        assert_eq!(buf.cursor(), 3);
        buf.move_left();
        assert_eq!(buf.cursor(), 1);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "a😀");
        buf.move_right();
        assert!(!buf.move_right());
        assert!(buf.backspace());
        assert_eq!(buf.text(), "a");
    }

    #[test]
    fn newline_is_literal() {
        let mut buf = typed("aaaa");
        buf.insert_newline();
        for ch in "bbbb".chars() {
            buf.insert(ch);
        }
        assert_eq!(buf.text(), "aaaa\nbbbb");
    }

    #[test]
    fn history_prev_saves_draft_and_clamps_at_oldest() {
        let history = history_of(&["one", "two"]);
        let mut buf = typed("dra");

        assert!(buf.history_prev(&history));
        assert_eq!(buf.text(), "two");
        assert_eq!(buf.history_index(), Some(0));
        assert_eq!(buf.draft(), "dra");

        assert!(buf.history_prev(&history));
        assert_eq!(buf.text(), "one");
        assert!(!buf.history_prev(&history));
        assert_eq!(buf.history_index(), Some(1));
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn history_next_restores_draft_verbatim() {
        let history = history_of(&["one", "two"]);
        let mut buf = LineBuffer::new();

        buf.history_prev(&history);
        buf.history_prev(&history);
        assert!(buf.history_next(&history));
        assert_eq!(buf.text(), "two");
        assert!(buf.history_next(&history));
        assert_eq!(buf.text(), "");
        assert_eq!(buf.history_index(), None);
        assert!(!buf.history_next(&history));
    }

    #[test]
    fn history_prev_on_empty_history_is_noop() {
        let mut buf = typed("x");
        assert!(!buf.history_prev(&HistoryStore::default()));
        assert_eq!(buf.text(), "x");
        assert_eq!(buf.history_index(), None);
    }

    #[test]
    fn edit_while_navigating_becomes_new_draft() {
        let history = history_of(&["one", "two"]);
        let mut buf = typed("draft");

        buf.history_prev(&history);
        buf.insert('!');
        assert_eq!(buf.history_index(), None);
        assert_eq!(buf.draft(), "two!");

        buf.history_prev(&history);
        assert_eq!(buf.text(), "two");
        buf.history_next(&history);
        assert_eq!(buf.text(), "two!");
    }

    #[test]
    fn moves_while_navigating_keep_index() {
        let history = history_of(&["one"]);
        let mut buf = LineBuffer::new();
        buf.history_prev(&history);
        buf.move_left();
        assert_eq!(buf.history_index(), Some(0));
    }

    #[test]
    fn replace_and_take_reset_state() {
        let mut buf = typed("/he");
        buf.replace("/help");
        assert_eq!(buf.text(), "/help");
        assert_eq!(buf.cursor(), 5);
        assert_eq!(buf.take(), "/help");
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(char),
            Newline,
            Backspace,
            Delete,
            Left,
            Right,
            Prev,
            Next,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<char>().prop_map(Op::Insert),
                Just(Op::Newline),
                Just(Op::Backspace),
                Just(Op::Delete),
                Just(Op::Left),
                Just(Op::Right),
                Just(Op::Prev),
                Just(Op::Next),
            ]
        }

        proptest! {
            #[test]
            fn cursor_stays_on_char_boundary(ops in proptest::collection::vec(op(), 0..64)) {
                let history = history_of(&["alpha", "βeta", "😀 gamma"]);
                let mut buf = LineBuffer::new();
                for op in ops {
                    match op {
                        Op::Insert(ch) => buf.insert(ch),
                        Op::Newline => buf.insert_newline(),
                        Op::Backspace => { buf.backspace(); }
                        Op::Delete => { buf.delete_forward(); }
                        Op::Left => { buf.move_left(); }
                        Op::Right => { buf.move_right(); }
                        Op::Prev => { buf.history_prev(&history); }
                        Op::Next => { buf.history_next(&history); }
                    }
                    prop_assert!(buf.cursor() <= buf.text().len());
                    prop_assert!(buf.text().is_char_boundary(buf.cursor()));
                }
            }
        }
    }
}
