//! termline: a scrollback-preserving terminal line editor.
//!
//! The editor redraws only the rows it owns, so output printed before the
//! prompt stays in the terminal's scrollback. It supports history, Ctrl+J
//! multi-line input, `/`-style completion, and a two-press Ctrl+C exit.
//!
//! # Quick start
//!
//! ```no_run
//! use termline::config::load_config;
//! use termline::error::ReadError;
//! use termline::tui::LineEditor;
//!
//! let config = load_config(None).unwrap();
//! let theme = config.resolve_theme().unwrap();
//! let mut editor = LineEditor::new(&config, theme);
//! loop {
//!     match editor.read_line_or_multiline() {
//!         Ok(line) => println!("{line}"),
//!         Err(ReadError::Eof | ReadError::Interrupted) => break,
//!         Err(err) => panic!("{err}"),
//!     }
//! }
//! let _ = editor.save_history();
//! ```

pub mod config;
pub mod error;
#[cfg(test)]
pub mod testsupport;
pub mod textutil;
pub mod tui;
pub mod ui;
