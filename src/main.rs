//! Demo REPL for termline.
//!
//! Echoes every submitted line and exercises history, multi-line entry,
//! completion, and the two-press Ctrl+C exit.

mod build_info;
mod cli;

use clap::Parser;
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use termline::config::{
    default_history_path, legacy_history_path, load_config_with_diagnostics, EditorConfig,
};
use termline::error::ReadError;
use termline::tui::{Candidate, HistoryStore, LineEditor, PromptStyle, Renderer};
use tracing_subscriber::EnvFilter;

const COMMANDS: [(&str, &str); 5] = [
    ("/help", "Show available commands"),
    ("/history", "Show recent history"),
    ("/multi", "Enter a multi-line message"),
    ("/clear-history", "Forget all history"),
    ("/quit", "Exit the demo"),
];

const HISTORY_PREVIEW: usize = 10;

fn main() {
    let args = cli::Args::parse();
    init_tracing();

    let loaded = match load_config_with_diagnostics(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let mut config = loaded.config;
    tracing::debug!(source = %loaded.source, "using configuration");

    // Apply CLI overrides.
    if let Some(path) = args.history_file {
        config.history_file = Some(path);
    }
    if let Some(prompt) = args.prompt {
        config.prompt = prompt;
    }
    if args.no_color {
        config.color = false;
    }

    let theme = match config.resolve_theme() {
        Ok(theme) => theme,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let mut renderer = Renderer::with_writer(
        PromptStyle::new(theme.clone(), config.color),
        io::stdout(),
    );
    for warning in &loaded.diagnostics.warnings {
        let _ = renderer.warn(warning);
    }

    migrate_legacy_history(&config, &mut renderer);
    let mut editor = LineEditor::new(&config, theme);
    let seen = install_completions(&mut editor);

    let _ = renderer.info(&format!(
        "termline {} | /help for commands, Ctrl+C twice to exit",
        build_info::startup_metadata_line()
    ));

    let status = run(&mut editor, &mut renderer, &seen);

    if let Err(e) = editor.save_history() {
        tracing::warn!(error = %e, "failed to save history");
        let _ = renderer.error(&e.to_string());
    }
    if let Err(e) = status {
        let _ = renderer.error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr so diagnostics never land inside the editor's rows.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TERMLINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Move `~/.termline_history` into `~/.termline/history` on first run.
fn migrate_legacy_history(config: &EditorConfig, renderer: &mut Renderer<Stdout>) {
    if config.history_file.is_some() {
        return;
    }
    let (Some(old), Some(new)) = (legacy_history_path(), default_history_path()) else {
        return;
    };
    match HistoryStore::migrate_legacy(&old, &new) {
        Ok(true) => {
            let _ = renderer.info(&format!("Moved history to {}", new.display()));
        }
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "failed to migrate legacy history"),
    }
}

/// Static commands plus single-word `/` entries the user has submitted.
fn install_completions(editor: &mut LineEditor) -> Arc<Mutex<Vec<String>>> {
    let seen: Vec<String> = editor
        .history()
        .entries()
        .iter()
        .filter(|entry| is_custom_command(entry))
        .cloned()
        .collect();
    let seen = Arc::new(Mutex::new(seen));

    let completer = editor.completer_mut();
    completer.set_static_candidates(COMMANDS);
    let provider_seen = Arc::clone(&seen);
    completer.set_dynamic_provider(move |prefix| {
        let Ok(seen) = provider_seen.lock() else {
            return Vec::new();
        };
        seen.iter()
            .filter(|entry| entry.starts_with(prefix))
            .map(|entry| Candidate::new(entry.as_str(), "from history"))
            .collect()
    });
    seen
}

fn is_custom_command(entry: &str) -> bool {
    entry.starts_with('/')
        && entry.len() > 1
        && !entry.chars().any(char::is_whitespace)
        && !COMMANDS.iter().any(|(name, _)| *name == entry)
}

fn run(
    editor: &mut LineEditor,
    renderer: &mut Renderer<Stdout>,
    seen: &Mutex<Vec<String>>,
) -> Result<(), ReadError> {
    loop {
        let line = match editor.read_line_or_multiline() {
            Ok(line) => line,
            Err(ReadError::Interrupted) => {
                renderer.info("Goodbye!")?;
                return Ok(());
            }
            Err(ReadError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        };

        match line.trim() {
            "" => {}
            "/quit" => return Ok(()),
            "/help" => {
                for (name, description) in COMMANDS {
                    renderer.print(&format!("  {name:<16}{description}"))?;
                }
                renderer.print("  Ctrl+J inserts a newline; end a line with ... to continue.")?;
            }
            "/history" => {
                let recent = editor.history().latest(HISTORY_PREVIEW);
                if recent.is_empty() {
                    renderer.info("History is empty.")?;
                }
                for entry in recent {
                    renderer.print(&format!("  {}", entry.replace('\n', " ⏎ ")))?;
                }
            }
            "/multi" => {
                let text = editor.read_multiline()?;
                if !text.is_empty() {
                    renderer.response(&text)?;
                }
            }
            "/clear-history" => {
                editor.history_mut().clear();
                if let Ok(mut seen) = seen.lock() {
                    seen.clear();
                }
                renderer.info("History cleared.")?;
            }
            other => {
                if is_custom_command(other) {
                    if let Ok(mut seen) = seen.lock() {
                        if !seen.iter().any(|entry| entry == other) {
                            seen.push(other.to_string());
                        }
                    }
                }
                renderer.response(&line)?;
            }
        }
    }
}
