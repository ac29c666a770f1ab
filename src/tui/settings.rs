//! Centralized, hardcoded editor settings.
//!
//! This is the single place to tweak prompt strings, glyphs, timing, and
//! indentation. Anything users can override lives in `EditorConfig`; the
//! values here are its defaults.

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// How long the decoder waits for the rest of an escape sequence.
pub const ESCAPE_TIMEOUT_MS: u64 = 50;
/// Window in which a second Ctrl+C exits.
pub const INTERRUPT_WINDOW_MS: u64 = 1000;

// ---------------------------------------------------------------------------
// Layout / indentation
// ---------------------------------------------------------------------------

/// Prefix for every logical line after the first.
pub const CONTINUATION_INDENT: &str = "  ";
pub const CONTINUATION_INDENT_WIDTH: usize = CONTINUATION_INDENT.len();

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

pub const DEFAULT_PROMPT: &str = "✦ ";

pub const INTERRUPT_NOTICE: &str = "(Press Ctrl+C again to exit)";

pub const MULTILINE_CONTINUE_HINT: &str =
    "Continue typing (type '.' on empty line or Ctrl+D to finish):";
pub const MULTILINE_ENTER_HINT: &str =
    "Enter multiple lines (type '.' on empty line or Ctrl+D to finish):";
/// Line that terminates multi-line entry.
pub const MULTILINE_TERMINATOR: &str = ".";

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";

// ---------------------------------------------------------------------------
// Completion UI
// ---------------------------------------------------------------------------

pub const MAX_COMPLETIONS: usize = 6;
pub const COMPLETION_TRIGGER: &str = "/";
pub const COMPLETION_SEPARATOR: &str = " - ";

pub const COMPLETION_SELECTED_COLOR: &str = "▶ ";
pub const COMPLETION_UNSELECTED_COLOR: &str = "  ";
pub const COMPLETION_SELECTED_PLAIN: &str = "> ";
pub const COMPLETION_UNSELECTED_PLAIN: &str = "  ";

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

/// Numbered prompt for line `n` (1-based) of `read_multiline`.
pub fn multiline_prompt_text(n: usize) -> String {
    format!("{n:2}> ")
}

pub fn completion_marker(is_selected: bool, color: bool) -> &'static str {
    match (is_selected, color) {
        (true, true) => COMPLETION_SELECTED_COLOR,
        (false, true) => COMPLETION_UNSELECTED_COLOR,
        (true, false) => COMPLETION_SELECTED_PLAIN,
        (false, false) => COMPLETION_UNSELECTED_PLAIN,
    }
}
