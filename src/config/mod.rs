//! Editor configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`TERMLINE_HISTORY_FILE`, `TERMLINE_PROMPT`,
//!    `TERMLINE_THEME`, `NO_COLOR`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./termline.toml in the current directory
//! 4. $XDG_CONFIG_HOME/termline/termline.toml (or ~/.config/termline/termline.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use crate::ui::theme::{Theme, ThemeRegistry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

mod defaults;
mod loader;

pub use defaults::{default_history_path, legacy_history_path};
pub use loader::{config_root_dir, load_config, load_config_with_diagnostics};

use defaults::{
    expand_home, DEFAULT_COMPLETION_TRIGGER, DEFAULT_ESCAPE_TIMEOUT_MS,
    DEFAULT_INTERRUPT_WINDOW_MS, DEFAULT_MAX_COMPLETIONS, DEFAULT_MAX_HISTORY, DEFAULT_PROMPT,
    DEFAULT_THEME,
};

/// Runtime configuration for [`crate::tui::LineEditor`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub prompt: String,
    /// Emit ANSI colors. `NO_COLOR` forces this off.
    pub color: bool,
    /// History file; `None` means `~/.termline/history`. A leading `~/`
    /// is expanded.
    pub history_file: Option<String>,
    pub max_history: usize,
    pub interrupt_window_ms: u64,
    /// How long a lone ESC waits for the rest of a sequence.
    pub escape_timeout_ms: u64,
    pub max_completions: usize,
    pub completion_trigger: String,
    pub theme: String,
    /// `[themes.<name>]` tables mapping theme keys to colors.
    pub themes: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            color: true,
            history_file: None,
            max_history: DEFAULT_MAX_HISTORY,
            interrupt_window_ms: DEFAULT_INTERRUPT_WINDOW_MS,
            escape_timeout_ms: DEFAULT_ESCAPE_TIMEOUT_MS,
            max_completions: DEFAULT_MAX_COMPLETIONS,
            completion_trigger: DEFAULT_COMPLETION_TRIGGER.to_string(),
            theme: DEFAULT_THEME.to_string(),
            themes: BTreeMap::new(),
        }
    }
}

impl EditorConfig {
    pub fn interrupt_window(&self) -> Duration {
        Duration::from_millis(self.interrupt_window_ms)
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    /// Resolved history path, or `None` when no home directory is known.
    pub fn history_path(&self) -> Option<PathBuf> {
        match self.history_file.as_deref() {
            Some(path) => Some(expand_home(path)),
            None => default_history_path(),
        }
    }

    /// Built-in themes plus this config's `[themes.*]` overrides.
    pub fn theme_registry(&self) -> Result<ThemeRegistry, ConfigError> {
        ThemeRegistry::from_overrides(&self.themes).map_err(ConfigError::Invalid)
    }

    /// The theme named by `theme`.
    pub fn resolve_theme(&self) -> Result<Theme, ConfigError> {
        self.theme_registry()?
            .select(&self.theme)
            .map_err(ConfigError::Invalid)
    }
}

/// Where the loaded config text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Config loaded from explicit `--config` path.
    Explicit(PathBuf),
    /// Config loaded from local `./termline.toml`.
    Local,
    /// Config loaded from the per-user config root.
    Global(PathBuf),
    /// No file found; defaults were used.
    BuiltInDefaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) | Self::Global(path) => write!(f, "{}", path.display()),
            Self::Local => write!(f, "./termline.toml"),
            Self::BuiltInDefaults => write!(f, "built-in defaults"),
        }
    }
}

/// Non-fatal problems found while loading; values were adjusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    pub warnings: Vec<String>,
}

/// Config plus where it came from and any adjustments made.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: EditorConfig,
    pub source: ConfigSource,
    pub diagnostics: ConfigDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::loader::load_config_from_sources;
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;

    fn load_with(
        files: &[(&str, &str)],
        env: &[(&str, &str)],
        path_override: Option<&str>,
    ) -> Result<LoadedConfig, ConfigError> {
        let files: HashMap<PathBuf, String> = files
            .iter()
            .map(|(p, t)| (PathBuf::from(p), t.to_string()))
            .collect();
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_from_sources(
            path_override,
            |path: &Path| {
                files
                    .get(path)
                    .cloned()
                    .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
            },
            |name| env.get(name).cloned(),
            || Some(PathBuf::from("/cfg")),
        )
    }

    #[test]
    fn defaults_are_sensible() {
        let c = EditorConfig::default();
        assert_eq!(c.prompt, "✦ ");
        assert!(c.color);
        assert_eq!(c.max_history, 1000);
        assert_eq!(c.interrupt_window(), Duration::from_secs(1));
        assert_eq!(c.escape_timeout(), Duration::from_millis(50));
        assert_eq!(c.max_completions, 6);
        assert_eq!(c.completion_trigger, "/");
        assert_eq!(c.theme, "dark");
        assert!(c.themes.is_empty());
    }

    #[test]
    fn no_file_uses_builtin_defaults() {
        let loaded = load_with(&[], &[], None).unwrap();
        assert_eq!(loaded.source, ConfigSource::BuiltInDefaults);
        assert_eq!(loaded.config, EditorConfig::default());
        assert!(loaded.diagnostics.warnings.is_empty());
    }

    #[test]
    fn parse_partial_toml() {
        let toml = r#"
            prompt = "> "
            max_completions = 3

            [themes.dark]
            prompt = "magenta"
        "#;
        let loaded = load_with(&[("termline.toml", toml)], &[], None).unwrap();
        assert_eq!(loaded.source, ConfigSource::Local);
        assert_eq!(loaded.config.prompt, "> ");
        assert_eq!(loaded.config.max_completions, 3);
        assert_eq!(loaded.config.escape_timeout_ms, 50);
        assert_eq!(loaded.config.themes["dark"]["prompt"], "magenta");
    }

    #[test]
    fn local_file_beats_global_file() {
        let loaded = load_with(
            &[
                ("termline.toml", "prompt = \"local\""),
                ("/cfg/termline/termline.toml", "prompt = \"global\""),
            ],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(loaded.config.prompt, "local");
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let loaded = load_with(
            &[("/cfg/termline/termline.toml", "prompt = \"global\"")],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(loaded.config.prompt, "global");
        assert_eq!(
            loaded.source,
            ConfigSource::Global(PathBuf::from("/cfg/termline/termline.toml"))
        );
    }

    #[test]
    fn explicit_path_beats_everything_and_must_exist() {
        let loaded = load_with(
            &[
                ("termline.toml", "prompt = \"local\""),
                ("/tmp/mine.toml", "prompt = \"mine\""),
            ],
            &[],
            Some("/tmp/mine.toml"),
        )
        .unwrap();
        assert_eq!(loaded.config.prompt, "mine");

        let err = load_with(&[], &[], Some("/tmp/absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn env_overrides_file_values() {
        let loaded = load_with(
            &[("termline.toml", "prompt = \"file\"\ncolor = true")],
            &[
                ("TERMLINE_PROMPT", "env> "),
                ("TERMLINE_HISTORY_FILE", "/var/hist"),
                ("NO_COLOR", "1"),
            ],
            None,
        )
        .unwrap();
        assert_eq!(loaded.config.prompt, "env> ");
        assert!(!loaded.config.color);
        assert_eq!(
            loaded.config.history_path(),
            Some(PathBuf::from("/var/hist"))
        );
    }

    #[test]
    fn empty_no_color_is_ignored() {
        let loaded = load_with(&[], &[("NO_COLOR", "")], None).unwrap();
        assert!(loaded.config.color);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let err = load_with(&[("termline.toml", "prompt = ")], &[], None).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn zero_limits_are_clamped_with_warnings() {
        let loaded = load_with(
            &[(
                "termline.toml",
                "max_history = 0\nmax_completions = 0\nescape_timeout_ms = 90000",
            )],
            &[],
            None,
        )
        .unwrap();
        assert_eq!(loaded.config.max_history, 1);
        assert_eq!(loaded.config.max_completions, 1);
        assert_eq!(loaded.config.escape_timeout_ms, 1000);
        assert_eq!(loaded.diagnostics.warnings.len(), 3);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for text in [
            "completion_trigger = \"\"",
            "completion_trigger = \"a b\"",
            "interrupt_window_ms = 0",
            "theme = \"nope\"",
            "[themes.dark]\nprompt = \"#zzzzzz\"",
        ] {
            let err = load_with(&[("termline.toml", text)], &[], None).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{text}");
        }
    }

    #[test]
    fn custom_theme_resolves() {
        let toml = r##"
            theme = "mine"
            [themes.mine]
            prompt = "#ff0000"
        "##;
        let loaded = load_with(&[("termline.toml", toml)], &[], None).unwrap();
        let theme = loaded.config.resolve_theme().unwrap();
        assert_eq!(theme.name, "mine");
    }

    #[test]
    fn explicit_history_file_expands_home() {
        let config = EditorConfig {
            history_file: Some("~/h".to_string()),
            ..EditorConfig::default()
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.history_path(), Some(home.join("h")));
        }
    }
}
