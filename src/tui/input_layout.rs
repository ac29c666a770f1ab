//! Terminal row/column layout helpers for the interactive editor.

use crate::tui::settings;
use crossterm::terminal;

/// Computed layout for prompt + input buffer on the terminal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InputLayout {
    /// Total terminal rows consumed by prompt + buffer.
    pub(crate) total_rows: usize,
    /// Row index where the cursor should be placed.
    pub(crate) cursor_row: usize,
    /// Column index where the cursor should be placed.
    pub(crate) cursor_col: usize,
    /// The last row is exactly full, so an explicit row break is needed for
    /// the cursor to sit after it.
    pub(crate) open_trailing_row: bool,
}

/// Read terminal width or fallback to 80 columns.
pub(crate) fn terminal_columns() -> usize {
    terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(80)
}

/// Rows a run of `cells` printable cells occupies at width `cols`.
///
/// `cols == 0` means unbounded. An empty run still takes one row.
pub(crate) fn rows_for_cells(cells: usize, cols: usize) -> usize {
    if cols == 0 || cells == 0 {
        return 1;
    }
    cells.div_ceil(cols)
}

/// Compute terminal layout for prompt + input and current cursor position.
///
/// `cursor` is a byte offset into `buffer`; columns count chars.
pub(crate) fn compute_input_layout(
    buffer: &str,
    cursor: usize,
    cols: usize,
    prompt_width: usize,
) -> InputLayout {
    let before = &buffer[..cursor.min(buffer.len())];
    let target_line = before.matches('\n').count();
    let target_col = before
        .rsplit('\n')
        .next()
        .map(|tail| tail.chars().count())
        .unwrap_or(0);

    let lines: Vec<&str> = buffer.split('\n').collect();
    let last = lines.len() - 1;

    let mut row = 0usize;
    let mut cursor_pos = (0usize, 0usize);
    let mut open_trailing_row = false;

    for (idx, line) in lines.iter().enumerate() {
        let prefix = if idx == 0 {
            prompt_width
        } else {
            settings::CONTINUATION_INDENT_WIDTH
        };
        let cells = prefix + line.chars().count();
        let mut line_rows = rows_for_cells(cells, cols);
        if idx == last && cols > 0 && cells > 0 && cells % cols == 0 {
            line_rows += 1;
            open_trailing_row = true;
        }

        if idx == target_line {
            let offset = prefix + target_col;
            cursor_pos = if cols == 0 {
                (row, offset)
            } else {
                (row + offset / cols, offset % cols)
            };
        }
        row += line_rows;
    }

    InputLayout {
        total_rows: row,
        cursor_row: cursor_pos.0,
        cursor_col: cursor_pos.1,
        open_trailing_row,
    }
}
