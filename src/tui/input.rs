//! Interactive line editor with history, multi-line entry, and completion.
//!
//! [`LineEditor`] owns the terminal for the duration of one read. Each read
//! acquires raw mode, runs a single-threaded event loop over an
//! [`InputChannel`], and redraws the input block in place so everything
//! printed before the prompt stays in scrollback.

use crate::config::EditorConfig;
use crate::error::{HistoryError, ReadError};
use crate::tui::completion::Completer;
use crate::tui::events::{EditorEvent, InputChannel};
use crate::tui::history::HistoryStore;
use crate::tui::input_buffer::LineBuffer;
use crate::tui::input_layout::terminal_columns;
use crate::tui::interrupt::{InterruptAction, InterruptState};
use crate::tui::keys::{KeyDecoder, KeyEvent};
use crate::tui::prompt::PromptStyle;
use crate::tui::raw_mode::RawModeGuard;
use crate::tui::redraw::Redrawer;
use crate::tui::settings;
use crate::ui::theme::Theme;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix on a submitted line that switches to multi-line entry.
const CONTINUATION_SUFFIX: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    /// Real terminal: raw mode per read, width queried on every frame.
    Terminal,
    /// Caller-supplied sink with a fixed width (`0` is unbounded).
    Scripted { columns: usize },
}

/// What a key did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Submit,
    Eof,
}

/// Everything a redraw depends on; an unchanged frame is not redrawn.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    columns: usize,
    text: String,
    cursor: usize,
    below: Vec<String>,
}

/// Scrollback-preserving line editor.
pub struct LineEditor<W: Write = io::Stdout> {
    out: W,
    input: InputChannel,
    decoder: KeyDecoder,
    style: PromptStyle,
    prompt: String,
    history: HistoryStore,
    history_path: Option<PathBuf>,
    completer: Completer,
    max_completions: usize,
    /// Lives across reads so expiry generations never repeat.
    interrupt: InterruptState,
    surface: Surface,
}

impl LineEditor<io::Stdout> {
    /// Editor on the process terminal, with history loaded from the
    /// configured path.
    ///
    /// A history file that exists but cannot be read is logged and the
    /// session starts with empty history.
    pub fn new(config: &EditorConfig, theme: Theme) -> Self {
        let mut editor = Self::with_io(config, theme, io::stdout(), InputChannel::terminal())
            .with_history_path(config.history_path());
        editor.surface = Surface::Terminal;
        if let Err(err) = editor.load_history() {
            tracing::warn!(error = %err, "failed to load history; starting empty");
        }
        editor
    }
}

impl<W: Write> LineEditor<W> {
    /// Editor writing to `out` and reading from `input`.
    ///
    /// Raw mode is never touched and the width is unbounded until
    /// [`Self::with_columns`] says otherwise. No history path is set.
    pub fn with_io(config: &EditorConfig, theme: Theme, out: W, input: InputChannel) -> Self {
        Self {
            out,
            input,
            decoder: KeyDecoder::raw_terminal(config.escape_timeout()),
            style: PromptStyle::new(theme, config.color),
            prompt: config.prompt.clone(),
            history: HistoryStore::with_capacity(config.max_history),
            history_path: None,
            completer: Completer::new(config.completion_trigger.clone()),
            max_completions: config.max_completions.max(1),
            interrupt: InterruptState::new(config.interrupt_window()),
            surface: Surface::Scripted { columns: 0 },
        }
    }

    /// Fix the terminal width used for wrap math.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.surface = Surface::Scripted { columns };
        self
    }

    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub fn history_path(&self) -> Option<&Path> {
        self.history_path.as_deref()
    }

    pub fn completer_mut(&mut self) -> &mut Completer {
        &mut self.completer
    }

    pub fn style(&self) -> &PromptStyle {
        &self.style
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Replace in-memory history with the file's contents.
    ///
    /// On failure the current history is left as it was.
    pub fn load_history(&mut self) -> Result<(), HistoryError> {
        let Some(path) = &self.history_path else {
            return Ok(());
        };
        let mut loaded = HistoryStore::with_capacity(self.history.capacity());
        loaded.load(path)?;
        self.history = loaded;
        Ok(())
    }

    /// Write history to its file. A no-op when no path is configured.
    pub fn save_history(&self) -> Result<(), HistoryError> {
        match &self.history_path {
            Some(path) => self.history.save(path),
            None => Ok(()),
        }
    }

    /// Read one line with plain line-buffered input: no editing keys, no
    /// history.
    pub fn read_line(&mut self) -> Result<String, ReadError> {
        let prompt = self.style.primary(&self.prompt);
        self.read_cooked_line(&prompt)?.ok_or(ReadError::Eof)
    }

    /// Read one line with full editing. A non-blank result joins history.
    pub fn read_line_with_history(&mut self) -> Result<String, ReadError> {
        let line = self.edit_line()?;
        self.history.add(&line);
        Ok(line)
    }

    /// Read one line; a trailing `...` switches to numbered multi-line entry.
    ///
    /// The suffix is stripped and the rest of the first line is kept unless
    /// blank. Lines are then collected until a line holding only `.` or end
    /// of input, and returned joined with `\n`.
    pub fn read_line_or_multiline(&mut self) -> Result<String, ReadError> {
        let line = self.edit_line()?;
        let Some(head) = line.strip_suffix(CONTINUATION_SUFFIX) else {
            self.history.add(&line);
            return Ok(line);
        };

        let mut lines = Vec::new();
        if !head.trim().is_empty() {
            lines.push(head.to_string());
        }
        self.write_hint(settings::MULTILINE_CONTINUE_HINT)?;
        self.collect_numbered_lines(&mut lines, 2)?;

        let text = lines.join("\n");
        self.history.add(&text);
        Ok(text)
    }

    /// Collect numbered lines until `.` or end of input.
    pub fn read_multiline(&mut self) -> Result<String, ReadError> {
        self.write_hint(settings::MULTILINE_ENTER_HINT)?;
        let mut lines = Vec::new();
        self.collect_numbered_lines(&mut lines, 1)?;

        let text = lines.join("\n");
        self.history.add(&text);
        Ok(text)
    }

    fn write_hint(&mut self, hint: &str) -> io::Result<()> {
        let hint = self.style.hint(hint);
        writeln!(self.out, "{hint}")?;
        self.out.flush()
    }

    fn collect_numbered_lines(
        &mut self,
        lines: &mut Vec<String>,
        first_number: usize,
    ) -> Result<(), ReadError> {
        let mut number = first_number;
        loop {
            let prompt = self.style.numbered(number);
            let Some(line) = self.read_cooked_line(&prompt)? else {
                return Ok(());
            };
            if line.trim_end() == settings::MULTILINE_TERMINATOR {
                return Ok(());
            }
            lines.push(line);
            number += 1;
        }
    }

    /// Print `prompt` and read one line in cooked mode. `None` at end of
    /// input.
    fn read_cooked_line(&mut self, prompt: &str) -> Result<Option<String>, ReadError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let Some(bytes) = self.input.read_raw_line()? else {
            writeln!(self.out)?;
            self.out.flush()?;
            return Ok(None);
        };
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// One editing session, falling back to cooked input when stdin is not
    /// a terminal.
    fn edit_line(&mut self) -> Result<String, ReadError> {
        let _raw = match self.surface {
            Surface::Scripted { .. } => None,
            Surface::Terminal => match RawModeGuard::acquire() {
                Ok(guard) => Some(guard),
                Err(ReadError::NotATerminal) => {
                    tracing::debug!("stdin is not a terminal; using line-buffered input");
                    return self.read_line();
                }
                Err(err) => return Err(err),
            },
        };
        let result = self.run_session();
        // Any warning still armed belongs to this session only.
        self.interrupt.disarm();
        self.completer.dismiss();
        result
    }

    fn columns(&self) -> usize {
        match self.surface {
            Surface::Terminal => terminal_columns(),
            Surface::Scripted { columns } => columns,
        }
    }

    fn frame(&self, buffer: &LineBuffer) -> Frame {
        let columns = self.columns();
        let below = if self.completer.is_visible() {
            let rows = self.completer.render(self.max_completions);
            self.style.completion_rows(&rows, columns)
        } else {
            Vec::new()
        };
        Frame {
            columns,
            text: buffer.text().to_string(),
            cursor: buffer.cursor(),
            below,
        }
    }

    fn draw(
        &mut self,
        redrawer: &mut Redrawer,
        prompt: &str,
        frame: &Frame,
    ) -> io::Result<()> {
        redrawer.set_columns(frame.columns);
        redrawer.redraw(&mut self.out, prompt, &frame.text, frame.cursor, &frame.below)?;
        // A redraw wipes the notice row; an armed warning must stay visible.
        if self.interrupt.is_armed() {
            let notice = self.style.interrupt_notice();
            redrawer.show_notice(&mut self.out, &notice)?;
        }
        Ok(())
    }

    fn run_session(&mut self) -> Result<String, ReadError> {
        let prompt = self.style.primary(&self.prompt);
        let tx = self.input.sender();
        let mut buffer = LineBuffer::new();
        let mut redrawer = Redrawer::new(self.columns());
        let mut last_frame: Option<Frame> = None;
        self.completer.dismiss();

        loop {
            let frame = self.frame(&buffer);
            if last_frame.as_ref() != Some(&frame) {
                self.draw(&mut redrawer, &prompt, &frame)?;
                last_frame = Some(frame);
            }

            let key = match self.input.next_event(&self.decoder)? {
                EditorEvent::Closed => {
                    redrawer.finish(&mut self.out)?;
                    return Err(ReadError::Eof);
                }
                EditorEvent::InterruptExpired(generation) => {
                    if self.interrupt.on_expiry(generation) {
                        redrawer.clear_notice(&mut self.out)?;
                    }
                    continue;
                }
                EditorEvent::Key(key) => key,
            };

            if key == KeyEvent::CtrlC {
                match self.interrupt.on_ctrl_c(&tx) {
                    InterruptAction::Warn => {
                        let notice = self.style.interrupt_notice();
                        redrawer.show_notice(&mut self.out, &notice)?;
                    }
                    InterruptAction::Exit => {
                        redrawer.finish(&mut self.out)?;
                        return Err(ReadError::Interrupted);
                    }
                }
                continue;
            }

            if self.interrupt.disarm() {
                redrawer.clear_notice(&mut self.out)?;
            }

            match self.apply_key(&mut buffer, key) {
                KeyOutcome::Continue => {}
                KeyOutcome::Submit => {
                    // Final frame without the completion list.
                    self.completer.dismiss();
                    let frame = self.frame(&buffer);
                    if last_frame.as_ref() != Some(&frame) {
                        self.draw(&mut redrawer, &prompt, &frame)?;
                    }
                    redrawer.finish(&mut self.out)?;
                    return Ok(buffer.take());
                }
                KeyOutcome::Eof => {
                    redrawer.finish(&mut self.out)?;
                    return Err(ReadError::Eof);
                }
            }
        }
    }

    fn apply_key(&mut self, buffer: &mut LineBuffer, key: KeyEvent) -> KeyOutcome {
        match key {
            KeyEvent::Enter => return KeyOutcome::Submit,
            KeyEvent::CtrlD => {
                if buffer.is_empty() {
                    return KeyOutcome::Eof;
                }
            }
            KeyEvent::CtrlJ => {
                buffer.insert_newline();
                self.completer.update(buffer.text());
            }
            KeyEvent::Tab => {
                if let Some(candidate) = self.completer.selected() {
                    let text = candidate.text.clone();
                    buffer.replace(&text);
                }
                self.completer.dismiss();
            }
            KeyEvent::ArrowUp => {
                if self.completer.is_visible() {
                    self.completer.move_selection(-1);
                } else if buffer.history_prev(&self.history) {
                    self.completer.dismiss();
                }
            }
            KeyEvent::ArrowDown => {
                if self.completer.is_visible() {
                    self.completer.move_selection(1);
                } else if buffer.history_next(&self.history) {
                    self.completer.dismiss();
                }
            }
            KeyEvent::ArrowLeft => {
                buffer.move_left();
            }
            KeyEvent::ArrowRight => {
                buffer.move_right();
            }
            KeyEvent::Backspace => {
                if buffer.backspace() {
                    self.completer.update(buffer.text());
                }
            }
            KeyEvent::Delete => {
                if buffer.delete_forward() {
                    self.completer.update(buffer.text());
                }
            }
            KeyEvent::Rune(ch) => {
                buffer.insert(ch);
                self.completer.update(buffer.text());
            }
            KeyEvent::CtrlC | KeyEvent::Escape | KeyEvent::Unknown => {}
        }
        KeyOutcome::Continue
    }
}

impl<W: Write> std::fmt::Debug for LineEditor<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineEditor")
            .field("prompt", &self.prompt)
            .field("history_len", &self.history.len())
            .field("history_path", &self.history_path)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
