//! Default configuration constants.

use std::path::PathBuf;

use crate::tui::settings;

pub(super) const DEFAULT_PROMPT: &str = settings::DEFAULT_PROMPT;
pub(super) const DEFAULT_MAX_HISTORY: usize = crate::tui::history::DEFAULT_MAX_ENTRIES;
pub(super) const DEFAULT_INTERRUPT_WINDOW_MS: u64 = settings::INTERRUPT_WINDOW_MS;
pub(super) const DEFAULT_ESCAPE_TIMEOUT_MS: u64 = settings::ESCAPE_TIMEOUT_MS;
pub(super) const DEFAULT_MAX_COMPLETIONS: usize = settings::MAX_COMPLETIONS;
pub(super) const DEFAULT_COMPLETION_TRIGGER: &str = settings::COMPLETION_TRIGGER;
pub(super) const DEFAULT_THEME: &str = "dark";

/// File name looked up in the working directory and the config root.
pub(super) const CONFIG_FILE_NAME: &str = "termline.toml";
/// Directory under the config root holding [`CONFIG_FILE_NAME`].
pub(super) const CONFIG_DIR_NAME: &str = "termline";

/// Escape waits longer than this stop being a timeout and become a stall.
pub(super) const MAX_ESCAPE_TIMEOUT_MS: u64 = 1000;

/// Return the default history path (`~/.termline/history`).
pub fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".termline").join("history"))
}

/// Return the pre-directory history path (`~/.termline_history`).
///
/// Older installs kept history in a single dotfile; callers migrate it with
/// [`crate::tui::history::HistoryStore::migrate_legacy`].
pub fn legacy_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".termline_history"))
}

/// Expand a leading `~/` against the home directory.
pub(super) fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
