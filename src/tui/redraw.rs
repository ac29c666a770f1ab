//! In-place redraw of the input block.
//!
//! The editor owns a contiguous run of terminal rows: the prompt line, any
//! continuation lines, and optional rows drawn below them (the completion
//! list). Every redraw clears exactly those rows, starting from the row the
//! cursor was left on, and draws the new frame in their place. Nothing above
//! the block is ever touched, which keeps scrollback intact.

use crate::textutil::visible_length;
use crate::tui::input_layout::compute_input_layout;
use crate::tui::settings;
use crate::tui::term;
use crossterm::style::Print;
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// Tracks what is on screen so the next frame can replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redrawer {
    /// Terminal width used for soft-wrap math; `0` means unbounded.
    columns: usize,
    /// Rows in the current block, `0` before the first draw.
    displayed_rows: usize,
    /// Block row the terminal cursor was left on.
    cursor_row: usize,
    cursor_col: usize,
    /// An inline notice occupies the row just below the block.
    notice_visible: bool,
}

impl Redrawer {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns;
    }

    pub fn displayed_rows(&self) -> usize {
        self.displayed_rows
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn notice_visible(&self) -> bool {
        self.notice_visible
    }

    /// Replace the current block with a new frame.
    ///
    /// `prompt` may contain color codes. `below` rows are drawn under the
    /// input, one terminal row each; callers clip them to the width.
    pub fn redraw<W: Write>(
        &mut self,
        w: &mut W,
        prompt: &str,
        text: &str,
        cursor: usize,
        below: &[String],
    ) -> io::Result<()> {
        if self.notice_visible {
            self.queue_clear_notice(w)?;
        }
        self.queue_clear_block(w)?;

        let layout = compute_input_layout(text, cursor, self.columns, visible_length(prompt));

        term::carriage_return(w)?;
        term::clear_line(w)?;
        w.queue(Print(prompt))?;
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            w.queue(Print(first))?;
        }
        for line in lines {
            term::new_row(w)?;
            w.queue(Print(settings::CONTINUATION_INDENT))?;
            w.queue(Print(line))?;
        }
        if layout.open_trailing_row {
            term::new_row(w)?;
        }
        for row in below {
            term::new_row(w)?;
            w.queue(Print(row))?;
        }

        let block_rows = layout.total_rows + below.len();
        term::cursor_up(w, block_rows - 1)?;
        term::carriage_return(w)?;
        term::cursor_down(w, layout.cursor_row)?;
        term::cursor_forward(w, layout.cursor_col)?;

        self.displayed_rows = block_rows;
        self.cursor_row = layout.cursor_row;
        self.cursor_col = layout.cursor_col;
        w.flush()
    }

    /// Show `text` on the row below the block without redrawing the input.
    ///
    /// The row is reserved first, so a block at the bottom of the screen
    /// scrolls up before the cursor position is saved.
    pub fn show_notice<W: Write>(&mut self, w: &mut W, text: &str) -> io::Result<()> {
        if self.notice_visible {
            self.queue_clear_notice(w)?;
        }
        let rows = self.displayed_rows.max(1);
        let to_notice = rows - self.cursor_row;

        term::cursor_down(w, rows - 1 - self.cursor_row)?;
        w.queue(Print('\n'))?;
        term::cursor_up(w, to_notice)?;
        term::carriage_return(w)?;
        term::cursor_forward(w, self.cursor_col)?;

        term::save_cursor(w)?;
        term::cursor_down(w, to_notice)?;
        term::carriage_return(w)?;
        term::clear_line(w)?;
        w.queue(Print(text))?;
        term::restore_cursor(w)?;

        self.notice_visible = true;
        w.flush()
    }

    /// Erase the notice row, leaving the input untouched.
    pub fn clear_notice<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if !self.notice_visible {
            return Ok(());
        }
        self.queue_clear_notice(w)?;
        w.flush()
    }

    /// Leave the cursor at column 0 of the row after the block and forget it.
    ///
    /// Output written afterwards lands below the final frame.
    pub fn finish<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if self.notice_visible {
            self.queue_clear_notice(w)?;
        }
        if self.displayed_rows > 0 {
            term::cursor_down(w, self.displayed_rows - 1 - self.cursor_row)?;
        }
        w.queue(Print("\r\n"))?;
        self.reset();
        w.flush()
    }

    /// Forget the current block without touching the terminal.
    pub fn reset(&mut self) {
        self.displayed_rows = 0;
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.notice_visible = false;
    }

    fn queue_clear_notice<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        let to_notice = self.displayed_rows.max(1) - self.cursor_row;
        term::save_cursor(w)?;
        term::cursor_down(w, to_notice)?;
        term::carriage_return(w)?;
        term::clear_line(w)?;
        term::restore_cursor(w)?;
        self.notice_visible = false;
        Ok(())
    }

    fn queue_clear_block<W: Write>(&self, w: &mut W) -> io::Result<()> {
        if self.displayed_rows == 0 {
            return Ok(());
        }
        term::cursor_up(w, self.cursor_row)?;
        term::carriage_return(w)?;
        for row in 0..self.displayed_rows {
            term::clear_line(w)?;
            if row + 1 < self.displayed_rows {
                term::cursor_down(w, 1)?;
                term::carriage_return(w)?;
            }
        }
        term::cursor_up(w, self.displayed_rows - 1)?;
        Ok(())
    }
}
