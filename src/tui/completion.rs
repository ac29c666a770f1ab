//! Prefix completion candidates and selection state.

use std::collections::BTreeMap;
use std::fmt;

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub description: String,
}

impl Candidate {
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }
}

impl<T: Into<String>, D: Into<String>> From<(T, D)> for Candidate {
    fn from((text, description): (T, D)) -> Self {
        Self::new(text, description)
    }
}

/// Callback producing extra candidates for the current prefix.
pub type DynamicProvider = Box<dyn Fn(&str) -> Vec<Candidate> + Send>;

/// One visible row of a rendered completion window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRow<'a> {
    pub candidate: &'a Candidate,
    pub selected: bool,
}

/// Static + dynamic candidate sources with a selection cursor.
#[derive(Default)]
pub struct Completer {
    statics: Vec<Candidate>,
    dynamic: Option<DynamicProvider>,
    trigger: String,
    candidates: Vec<Candidate>,
    selected: usize,
    visible: bool,
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("statics", &self.statics.len())
            .field("dynamic", &self.dynamic.is_some())
            .field("trigger", &self.trigger)
            .field("candidates", &self.candidates)
            .field("selected", &self.selected)
            .field("visible", &self.visible)
            .finish()
    }
}

impl Completer {
    /// Completer that activates when the buffer starts with `trigger`.
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            ..Self::default()
        }
    }

    pub fn set_static_candidates<I, C>(&mut self, list: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Candidate>,
    {
        self.statics = list.into_iter().map(Into::into).collect();
    }

    pub fn set_dynamic_provider<F>(&mut self, provider: F)
    where
        F: Fn(&str) -> Vec<Candidate> + Send + 'static,
    {
        self.dynamic = Some(Box::new(provider));
    }

    /// Static and dynamic candidates starting with `prefix`, deduplicated by
    /// text (first description wins) and sorted by text.
    pub fn filter(&self, prefix: &str) -> Vec<Candidate> {
        let mut by_text: BTreeMap<String, Candidate> = BTreeMap::new();
        let dynamic = self
            .dynamic
            .as_ref()
            .map(|provider| provider(prefix))
            .unwrap_or_default();
        for candidate in self.statics.iter().cloned().chain(dynamic) {
            if !candidate.text.starts_with(prefix) {
                continue;
            }
            by_text.entry(candidate.text.clone()).or_insert(candidate);
        }
        by_text.into_values().collect()
    }

    /// Whether `buffer` should show completions: it starts with the trigger
    /// and has not yet reached an argument separator.
    pub fn triggers_on(&self, buffer: &str) -> bool {
        !self.trigger.is_empty()
            && buffer.starts_with(self.trigger.as_str())
            && !buffer.chars().any(char::is_whitespace)
    }

    /// Recompute candidates for the current buffer contents.
    ///
    /// Selection resets to the first row whenever the list changes.
    pub fn update(&mut self, buffer: &str) {
        if !self.triggers_on(buffer) {
            self.dismiss();
            return;
        }
        let candidates = self.filter(buffer);
        if candidates != self.candidates {
            self.selected = 0;
        }
        self.candidates = candidates;
        self.visible = !self.candidates.is_empty();
    }

    /// Hide the list and drop all candidates.
    pub fn dismiss(&mut self) {
        self.candidates.clear();
        self.selected = 0;
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Candidate> {
        if !self.visible {
            return None;
        }
        self.candidates.get(self.selected)
    }

    /// Move the selection by `delta`, clamped to the list bounds.
    pub fn move_selection(&mut self, delta: isize) {
        if !self.visible || self.candidates.is_empty() {
            return;
        }
        let last = self.candidates.len() - 1;
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, last as isize) as usize;
    }

    /// Rows to draw: at most `max_visible`, windowed around the selection.
    pub fn render(&self, max_visible: usize) -> Vec<CompletionRow<'_>> {
        if !self.visible {
            return Vec::new();
        }
        let len = self.candidates.len();
        let (start, end) = window_bounds(len, self.selected, max_visible);
        self.candidates[start..end]
            .iter()
            .enumerate()
            .map(|(offset, candidate)| CompletionRow {
                candidate,
                selected: start + offset == self.selected,
            })
            .collect()
    }
}

/// `[start, end)` of a window of `max_visible` rows centred on `selected`.
fn window_bounds(len: usize, selected: usize, max_visible: usize) -> (usize, usize) {
    if max_visible == 0 || len <= max_visible {
        return (0, len);
    }
    let start = selected.saturating_sub(max_visible / 2).min(len - max_visible);
    (start, start + max_visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slash_completer() -> Completer {
        let mut completer = Completer::new("/");
        completer.set_static_candidates([
            ("/help", "Show help"),
            ("/history", "Show history"),
            ("/hello", "Say hello"),
        ]);
        completer
    }

    fn texts(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn filter_sorts_and_excludes_non_matches() {
        let completer = slash_completer();
        assert_eq!(texts(&completer.filter("/he")), vec!["/hello", "/help"]);
    }

    #[test]
    fn filter_merges_dynamic_and_dedupes_by_text() {
        let mut completer = slash_completer();
        completer.set_dynamic_provider(|prefix| {
            vec![
                Candidate::new("/help", "duplicate"),
                Candidate::new("/hex", "dynamic"),
                Candidate::new("/zzz", "not matching"),
            ]
            .into_iter()
            .filter(|c| c.text.starts_with(prefix) || c.text == "/zzz")
            .collect()
        });
        let found = completer.filter("/he");
        assert_eq!(texts(&found), vec!["/hello", "/help", "/hex"]);
        // Static descriptions win over dynamic duplicates.
        assert_eq!(found[1].description, "Show help");
    }

    #[test]
    fn trigger_requires_prefix_and_no_separator() {
        let completer = slash_completer();
        assert!(completer.triggers_on("/he"));
        assert!(!completer.triggers_on("he"));
        assert!(!completer.triggers_on("/help me"));
        assert!(!completer.triggers_on("/help\nx"));
    }

    #[test]
    fn update_shows_and_hides_list() {
        let mut completer = slash_completer();
        completer.update("/h");
        assert!(completer.is_visible());
        assert_eq!(completer.candidates().len(), 3);

        completer.update("/nothing");
        assert!(!completer.is_visible());
        assert!(completer.selected().is_none());

        completer.update("plain text");
        assert!(!completer.is_visible());
    }

    #[test]
    fn move_selection_is_clamped() {
        let mut completer = slash_completer();
        completer.update("/h");
        completer.move_selection(-1);
        assert_eq!(completer.selected_index(), 0);
        completer.move_selection(10);
        assert_eq!(completer.selected_index(), 2);
        completer.move_selection(-1);
        assert_eq!(completer.selected().map(|c| c.text.as_str()), Some("/help"));
    }

    #[test]
    fn selection_survives_update_with_same_candidates() {
        let mut completer = slash_completer();
        completer.update("/h");
        completer.move_selection(1);
        completer.update("/h");
        assert_eq!(completer.selected_index(), 1);
        completer.update("/he");
        assert_eq!(completer.selected_index(), 0);
    }

    #[test]
    fn render_windows_around_selection() {
        let mut completer = Completer::new("/");
        completer.set_static_candidates((0..10).map(|i| (format!("/c{i}"), "")));
        completer.update("/");
        completer.move_selection(5);

        let rows = completer.render(4);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].candidate.text, "/c3");
        assert!(rows[2].selected);
        assert_eq!(rows.iter().filter(|r| r.selected).count(), 1);

        completer.move_selection(10);
        let rows = completer.render(4);
        assert_eq!(rows.last().map(|r| r.candidate.text.as_str()), Some("/c9"));
        assert!(rows[3].selected);
    }

    #[test]
    fn render_without_limit_shows_everything() {
        let mut completer = slash_completer();
        completer.update("/");
        assert_eq!(completer.render(0).len(), 3);
        assert_eq!(completer.render(10).len(), 3);
    }
}
