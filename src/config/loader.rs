//! Config-file source discovery, environment overrides, and validation.
//!
//! Source order implements the precedence contract:
//! explicit path > local file > global file > built-in defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, MAX_ESCAPE_TIMEOUT_MS};
use super::{ConfigDiagnostics, ConfigSource, EditorConfig, LoadedConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&str>) -> Result<EditorConfig, ConfigError> {
    Ok(load_config_with_diagnostics(path_override)?.config)
}

/// Load configuration and return the source it came from plus warnings.
pub fn load_config_with_diagnostics(
    path_override: Option<&str>,
) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) = read_config_text(path_override, &read_file, &config_root)?;
    let mut config: EditorConfig = toml::from_str(&config_text)?;
    apply_env_overrides(&mut config, &env_lookup);

    let mut diagnostics = ConfigDiagnostics::default();
    validate(&mut config, &mut diagnostics)?;
    tracing::debug!(source = %source, "configuration loaded");

    Ok(LoadedConfig {
        config,
        source,
        diagnostics,
    })
}

/// Read config text from the highest-precedence available source.
fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // 1) Explicit override path from CLI; a missing file is an error here.
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    // 2) Local file in the working directory.
    if let Ok(text) = read_file(Path::new(CONFIG_FILE_NAME)) {
        return Ok((text, ConfigSource::Local));
    }

    // 3) Per-user file under the config root.
    if let Some(dir) = config_root() {
        let global = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    // 4) Nothing found; the empty document parses into defaults.
    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

fn apply_env_overrides<FEnv>(config: &mut EditorConfig, env_lookup: &FEnv)
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(path) = non_empty(env_lookup("TERMLINE_HISTORY_FILE")) {
        config.history_file = Some(path);
    }
    if let Some(prompt) = env_lookup("TERMLINE_PROMPT") {
        config.prompt = prompt;
    }
    if let Some(theme) = non_empty(env_lookup("TERMLINE_THEME")) {
        config.theme = theme;
    }
    // https://no-color.org: any non-empty value disables color.
    if non_empty(env_lookup("NO_COLOR")).is_some() {
        config.color = false;
    }
}

fn validate(
    config: &mut EditorConfig,
    diagnostics: &mut ConfigDiagnostics,
) -> Result<(), ConfigError> {
    if config.completion_trigger.is_empty()
        || config.completion_trigger.chars().any(char::is_whitespace)
    {
        return Err(ConfigError::Invalid(format!(
            "completion_trigger `{}` must be non-empty and contain no whitespace",
            config.completion_trigger
        )));
    }
    if config.interrupt_window_ms == 0 {
        return Err(ConfigError::Invalid(
            "interrupt_window_ms must be at least 1".to_string(),
        ));
    }
    if config.max_history == 0 {
        diagnostics
            .warnings
            .push("max_history = 0 keeps no history; using 1".to_string());
        config.max_history = 1;
    }
    if config.max_completions == 0 {
        diagnostics
            .warnings
            .push("max_completions = 0 hides every completion; using 1".to_string());
        config.max_completions = 1;
    }
    if config.escape_timeout_ms > MAX_ESCAPE_TIMEOUT_MS {
        diagnostics.warnings.push(format!(
            "escape_timeout_ms = {} is too long; clamped to {MAX_ESCAPE_TIMEOUT_MS}",
            config.escape_timeout_ms
        ));
        config.escape_timeout_ms = MAX_ESCAPE_TIMEOUT_MS;
    }
    // Resolve the theme now so a typo fails at startup instead of mid-session.
    config.resolve_theme()?;
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Return the per-user config root (`$XDG_CONFIG_HOME` or `~/.config`).
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}
