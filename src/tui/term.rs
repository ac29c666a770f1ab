//! Relative cursor movement and line clearing.
//!
//! All control sequences the editor emits go through these helpers. Zero-count
//! moves are dropped because terminals treat `ESC[0A` as a one-row move.

use crossterm::cursor::{
    MoveDown, MoveRight, MoveUp, RestorePosition, SavePosition,
};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

fn count(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

pub fn cursor_up<W: Write>(w: &mut W, n: usize) -> io::Result<()> {
    if n > 0 {
        w.queue(MoveUp(count(n)))?;
    }
    Ok(())
}

pub fn cursor_down<W: Write>(w: &mut W, n: usize) -> io::Result<()> {
    if n > 0 {
        w.queue(MoveDown(count(n)))?;
    }
    Ok(())
}

pub fn cursor_forward<W: Write>(w: &mut W, n: usize) -> io::Result<()> {
    if n > 0 {
        w.queue(MoveRight(count(n)))?;
    }
    Ok(())
}

/// Clear from the cursor to the end of the current row.
pub fn clear_line<W: Write>(w: &mut W) -> io::Result<()> {
    w.queue(Clear(ClearType::UntilNewLine))?;
    Ok(())
}

pub fn carriage_return<W: Write>(w: &mut W) -> io::Result<()> {
    w.queue(Print('\r'))?;
    Ok(())
}

pub fn save_cursor<W: Write>(w: &mut W) -> io::Result<()> {
    w.queue(SavePosition)?;
    Ok(())
}

pub fn restore_cursor<W: Write>(w: &mut W) -> io::Result<()> {
    w.queue(RestorePosition)?;
    Ok(())
}

/// Start a new row below the current one at column 0.
pub fn new_row<W: Write>(w: &mut W) -> io::Result<()> {
    w.queue(Print("\n\r"))?;
    Ok(())
}
