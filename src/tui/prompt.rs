//! Prompt, completion-row, and notice text for the editor.
//!
//! Everything here returns finished strings (styled when color is on) so the
//! redraw engine only deals in text and cursor math.

use crate::textutil::clip_to_width;
use crate::tui::completion::CompletionRow;
use crate::tui::settings;
use crate::ui::theme::{Theme, ThemeToken};
use crossterm::style::Stylize;

/// Theme plus the color switch, as handed to every text builder.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptStyle {
    pub theme: Theme,
    pub color: bool,
}

impl PromptStyle {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self { theme, color }
    }

    pub fn plain() -> Self {
        Self::new(Theme::default(), false)
    }

    fn paint(&self, text: &str, token: ThemeToken) -> String {
        if self.color && !text.is_empty() {
            format!("{}", text.with(self.theme.color(token)))
        } else {
            text.to_string()
        }
    }

    /// The primary prompt in the prompt color.
    pub fn primary(&self, prompt: &str) -> String {
        self.paint(prompt, ThemeToken::Prompt)
    }

    /// Numbered prompt for line `n` of multi-line collection.
    pub fn numbered(&self, n: usize) -> String {
        self.paint(
            &settings::multiline_prompt_text(n),
            ThemeToken::ContinuationPrompt,
        )
    }

    pub fn interrupt_notice(&self) -> String {
        self.paint(settings::INTERRUPT_NOTICE, ThemeToken::Notice)
    }

    pub fn hint(&self, text: &str) -> String {
        self.paint(text, ThemeToken::Info)
    }

    /// One finished row per visible completion, clipped to `columns - 1` so
    /// no row soft-wraps. `columns == 0` disables clipping.
    pub fn completion_rows(&self, rows: &[CompletionRow<'_>], columns: usize) -> Vec<String> {
        let budget = if columns == 0 { usize::MAX } else { columns - 1 };
        rows.iter()
            .map(|row| self.completion_row(row, budget))
            .collect()
    }

    fn completion_row(&self, row: &CompletionRow<'_>, budget: usize) -> String {
        let marker = settings::completion_marker(row.selected, self.color);
        let description = &row.candidate.description;
        let separator = if description.is_empty() {
            ""
        } else {
            settings::COMPLETION_SEPARATOR
        };

        let mut remaining = budget;
        let mut take = |part: &str| -> String {
            let clipped = clip_to_width(part, remaining);
            remaining -= clipped.chars().count();
            clipped
        };
        let marker = take(marker);
        let text = take(&row.candidate.text);
        let separator = take(separator);
        let description = take(description);

        let marker_token = if row.selected {
            ThemeToken::CompletionSelected
        } else {
            ThemeToken::CompletionUnselected
        };
        format!(
            "{}{}{}{}",
            self.paint(&marker, marker_token),
            self.paint(&text, ThemeToken::CompletionText),
            self.paint(&separator, ThemeToken::CompletionDescription),
            self.paint(&description, ThemeToken::CompletionDescription),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textutil::strip_ansi;
    use crate::tui::completion::Candidate;

    #[test]
    fn plain_style_leaves_text_untouched() {
        let style = PromptStyle::plain();
        assert_eq!(style.primary("✦ "), "✦ ");
        assert_eq!(style.numbered(3), " 3> ");
        assert_eq!(style.interrupt_notice(), settings::INTERRUPT_NOTICE);
    }

    #[test]
    fn color_style_wraps_text_in_ansi() {
        let style = PromptStyle::new(Theme::dark(), true);
        let prompt = style.primary("✦ ");
        assert!(prompt.starts_with('\x1b'));
        assert_eq!(strip_ansi(&prompt), "✦ ");
    }

    #[test]
    fn completion_rows_mark_selection() {
        let help = Candidate::new("/help", "Show help");
        let hello = Candidate::new("/hello", "");
        let rows = [
            CompletionRow {
                candidate: &hello,
                selected: false,
            },
            CompletionRow {
                candidate: &help,
                selected: true,
            },
        ];
        let rendered = PromptStyle::plain().completion_rows(&rows, 0);
        assert_eq!(rendered, vec!["  /hello", "> /help - Show help"]);

        let colored = PromptStyle::new(Theme::dark(), true).completion_rows(&rows, 0);
        assert_eq!(strip_ansi(&colored[1]), "▶ /help - Show help");
    }

    #[test]
    fn completion_rows_are_clipped_to_width() {
        let long = Candidate::new("/status", "x".repeat(100));
        let rows = [CompletionRow {
            candidate: &long,
            selected: false,
        }];
        let rendered = PromptStyle::new(Theme::dark(), true).completion_rows(&rows, 20);
        assert_eq!(strip_ansi(&rendered[0]).chars().count(), 19);
    }
}
