//! Terminal output renderer for messages printed between reads.
//!
//! Every message starts with `\r` so it begins at column 0 even when the
//! cursor was left mid-row, and ends with a newline so the next prompt lands
//! on a fresh row below it. Nothing already on screen is rewritten.

use crate::tui::prompt::PromptStyle;
use crate::tui::settings;
use crate::tui::term;
use crate::ui::theme::ThemeToken;
use crossterm::style::{Print, Stylize};
use crossterm::QueueableCommand;
use std::io::{self, Write};

/// Styled message writer.
#[derive(Debug)]
pub struct Renderer<W: Write = io::Stdout> {
    out: W,
    style: PromptStyle,
}

impl<W: Write> Renderer<W> {
    pub fn with_writer(style: PromptStyle, out: W) -> Self {
        Self { out, style }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Unstyled line.
    pub fn print(&mut self, msg: &str) -> io::Result<()> {
        self.line(msg.to_string())
    }

    /// Reply text in the response color.
    pub fn response(&mut self, msg: &str) -> io::Result<()> {
        let text = self.paint(msg, ThemeToken::Response);
        self.line(text)
    }

    pub fn info(&mut self, msg: &str) -> io::Result<()> {
        let text = self.paint(msg, ThemeToken::Info);
        self.line(text)
    }

    pub fn warn(&mut self, msg: &str) -> io::Result<()> {
        let label = self.label(settings::LABEL_WARNING, ThemeToken::Warning);
        self.line(format!("{label} {msg}"))
    }

    pub fn error(&mut self, msg: &str) -> io::Result<()> {
        let label = self.label(settings::LABEL_ERROR, ThemeToken::Error);
        self.line(format!("{label} {msg}"))
    }

    /// Print `msg` on the row below the cursor and put the cursor back.
    ///
    /// The row is reserved with a newline first, so at the bottom of the
    /// screen the scroll happens before the position is saved.
    pub fn info_inline(&mut self, msg: &str) -> io::Result<()> {
        let text = self.paint(msg, ThemeToken::Info);
        self.out.queue(Print('\n'))?;
        term::cursor_up(&mut self.out, 1)?;
        term::save_cursor(&mut self.out)?;
        term::cursor_down(&mut self.out, 1)?;
        term::carriage_return(&mut self.out)?;
        term::clear_line(&mut self.out)?;
        self.out.queue(Print(text))?;
        term::restore_cursor(&mut self.out)?;
        self.out.flush()
    }

    fn line(&mut self, text: String) -> io::Result<()> {
        self.out.queue(Print(format!("\r{text}\r\n")))?;
        self.out.flush()
    }

    fn paint(&self, text: &str, token: ThemeToken) -> String {
        if self.style.color && !text.is_empty() {
            format!("{}", text.with(self.style.theme.color(token)))
        } else {
            text.to_string()
        }
    }

    fn label(&self, label: &str, token: ThemeToken) -> String {
        if self.style.color {
            format!("{}", label.with(self.style.theme.color(token)).bold())
        } else {
            label.to_string()
        }
    }
}
