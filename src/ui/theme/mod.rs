//! Semantic terminal theme system.
//!
//! Every color the editor and renderer emit resolves through a [`Theme`]
//! value. Themes are built once from config and handed to consumers; there is
//! no process-wide active theme.

use crossterm::style::Color;
use std::collections::BTreeMap;

/// Semantic color token used by terminal rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThemeToken {
    Prompt,
    ContinuationPrompt,
    Notice,
    CompletionSelected,
    CompletionUnselected,
    CompletionText,
    CompletionDescription,
    Info,
    Warning,
    Error,
    Response,
}

impl ThemeToken {
    /// Stable config key for this token (used by `[themes.<name>]` overrides).
    pub fn key(self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::ContinuationPrompt => "continuation_prompt",
            Self::Notice => "notice",
            Self::CompletionSelected => "completion_selected",
            Self::CompletionUnselected => "completion_unselected",
            Self::CompletionText => "completion_text",
            Self::CompletionDescription => "completion_description",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Response => "response",
        }
    }

    pub fn all() -> &'static [ThemeToken] {
        &[
            Self::Prompt,
            Self::ContinuationPrompt,
            Self::Notice,
            Self::CompletionSelected,
            Self::CompletionUnselected,
            Self::CompletionText,
            Self::CompletionDescription,
            Self::Info,
            Self::Warning,
            Self::Error,
            Self::Response,
        ]
    }
}

/// Named theme resolved by token.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// User-facing theme name (`dark`, `light`, or custom key).
    pub name: String,
    colors: BTreeMap<ThemeToken, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        dark_theme()
    }
}

impl Theme {
    /// Resolve a color for this theme.
    pub fn color(&self, token: ThemeToken) -> Color {
        self.colors
            .get(&token)
            .copied()
            .unwrap_or_else(|| dark_theme().color(token))
    }

    pub fn dark() -> Self {
        dark_theme()
    }

    pub fn light() -> Self {
        light_theme()
    }
}

/// Theme registry with built-ins and optional custom overrides.
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
}

impl ThemeRegistry {
    /// Build registry from built-ins plus custom `[themes.<name>]` overrides.
    ///
    /// Overrides with an unparseable color are rejected whole; the error names
    /// the theme and the offending value.
    pub fn from_overrides(
        overrides: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> Result<Self, String> {
        let mut themes = BTreeMap::new();
        let dark = dark_theme();
        let light = light_theme();
        themes.insert(dark.name.clone(), dark);
        themes.insert(light.name.clone(), light);

        for (name, values) in overrides {
            let normalized_name = normalize_theme_name(name);
            let base = themes
                .get(&normalized_name)
                .cloned()
                .unwrap_or_else(|| dark_theme_named(&normalized_name));
            let custom = apply_theme_overrides(base, values)
                .map_err(|err| format!("theme `{normalized_name}`: {err}"))?;
            themes.insert(normalized_name, custom);
        }

        Ok(Self { themes })
    }

    /// Stable ordered names.
    pub fn names(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }

    /// Resolve one theme by name.
    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.get(&normalize_theme_name(name))
    }

    /// Resolve `name`, rejecting unknown names with the list of known ones.
    pub fn select(&self, name: &str) -> Result<Theme, String> {
        self.get(name).cloned().ok_or_else(|| {
            let available = self.names().join(", ");
            format!("unknown theme `{name}`. Available themes: {available}")
        })
    }
}

fn apply_theme_overrides(
    base: Theme,
    overrides: &BTreeMap<String, String>,
) -> Result<Theme, String> {
    let mut colors = base.colors;
    for (key, value) in overrides {
        let Some(token) = token_from_key(key) else {
            tracing::warn!(key = key.as_str(), "ignoring unknown theme key");
            continue;
        };
        colors.insert(token, parse_color(value)?);
    }
    Ok(Theme {
        name: base.name,
        colors,
    })
}

fn token_from_key(key: &str) -> Option<ThemeToken> {
    let normalized = key.trim().to_ascii_lowercase();
    ThemeToken::all()
        .iter()
        .copied()
        .find(|token| token.key() == normalized)
}

fn normalize_theme_name(name: &str) -> String {
    let normalized = name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        "dark".to_string()
    } else {
        normalized
    }
}

fn dark_theme_named(name: &str) -> Theme {
    Theme {
        name: name.to_string(),
        colors: dark_colors(),
    }
}

fn dark_theme() -> Theme {
    dark_theme_named("dark")
}

fn light_theme() -> Theme {
    Theme {
        name: "light".to_string(),
        colors: light_colors(),
    }
}

fn dark_colors() -> BTreeMap<ThemeToken, Color> {
    let base00 = rgb_color(0x65, 0x7b, 0x83);
    let base2 = rgb_color(0xee, 0xe8, 0xd5);
    let yellow = rgb_color(0xb5, 0x89, 0x00);
    let orange = rgb_color(0xcb, 0x4b, 0x16);
    let red = rgb_color(0xdc, 0x32, 0x2f);
    let cyan = rgb_color(0x2a, 0xa1, 0x98);

    let mut map = BTreeMap::new();
    map.insert(ThemeToken::Prompt, cyan);
    map.insert(ThemeToken::ContinuationPrompt, base00);
    map.insert(ThemeToken::Notice, Color::AnsiValue(240));
    map.insert(ThemeToken::CompletionSelected, orange);
    map.insert(ThemeToken::CompletionUnselected, base00);
    map.insert(ThemeToken::CompletionText, yellow);
    map.insert(ThemeToken::CompletionDescription, base00);
    map.insert(ThemeToken::Info, cyan);
    map.insert(ThemeToken::Warning, yellow);
    map.insert(ThemeToken::Error, red);
    map.insert(ThemeToken::Response, base2);
    map
}

fn light_colors() -> BTreeMap<ThemeToken, Color> {
    let base0 = rgb_color(0x83, 0x94, 0x96);
    let base02 = rgb_color(0x07, 0x36, 0x42);
    let yellow = rgb_color(0xb5, 0x89, 0x00);
    let orange = rgb_color(0xcb, 0x4b, 0x16);
    let red = rgb_color(0xdc, 0x32, 0x2f);
    let blue = rgb_color(0x26, 0x8b, 0xd2);
    let cyan = rgb_color(0x2a, 0xa1, 0x98);

    let mut map = BTreeMap::new();
    map.insert(ThemeToken::Prompt, blue);
    map.insert(ThemeToken::ContinuationPrompt, base0);
    map.insert(ThemeToken::Notice, base0);
    map.insert(ThemeToken::CompletionSelected, orange);
    map.insert(ThemeToken::CompletionUnselected, base0);
    map.insert(ThemeToken::CompletionText, blue);
    map.insert(ThemeToken::CompletionDescription, base0);
    map.insert(ThemeToken::Info, cyan);
    map.insert(ThemeToken::Warning, yellow);
    map.insert(ThemeToken::Error, red);
    map.insert(ThemeToken::Response, base02);
    map
}

/// Parse `#RRGGBB`, an ANSI index (`0`-`255`), or a crossterm color name.
pub fn parse_color(input: &str) -> Result<Color, String> {
    let normalized = input.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err("theme color value cannot be empty".to_string());
    }
    if let Some(hex) = normalized.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("invalid hex color `{input}` (expected #RRGGBB)"));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|_| format!("invalid hex color `{input}`"))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|_| format!("invalid hex color `{input}`"))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|_| format!("invalid hex color `{input}`"))?;
        return Ok(Color::Rgb { r, g, b });
    }
    if let Ok(index) = normalized.parse::<u8>() {
        return Ok(Color::AnsiValue(index));
    }

    let color = match normalized.as_str() {
        "black" => Color::Black,
        "darkgrey" | "dark-gray" | "dark_grey" => Color::DarkGrey,
        "grey" | "gray" => Color::Grey,
        "white" => Color::White,
        "red" => Color::Red,
        "darkred" | "dark-red" => Color::DarkRed,
        "green" => Color::Green,
        "darkgreen" | "dark-green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "darkyellow" | "dark-yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "darkblue" | "dark-blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "darkmagenta" | "dark-magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "darkcyan" | "dark-cyan" => Color::DarkCyan,
        _ => return Err(format!("unsupported color value `{input}`")),
    };
    Ok(color)
}

fn rgb_color(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_builtin_themes() {
        let registry = ThemeRegistry::from_overrides(&BTreeMap::new()).expect("registry");
        let names = registry.names();
        assert!(names.contains(&"dark".to_string()));
        assert!(names.contains(&"light".to_string()));
    }

    #[test]
    fn custom_override_applies() {
        let mut overrides = BTreeMap::new();
        let mut custom = BTreeMap::new();
        custom.insert("warning".to_string(), "#aabbcc".to_string());
        overrides.insert("custom".to_string(), custom);
        let registry = ThemeRegistry::from_overrides(&overrides).expect("registry");
        let custom_theme = registry.get("custom").expect("custom theme should exist");
        assert_eq!(
            custom_theme.color(ThemeToken::Warning),
            Color::Rgb {
                r: 0xaa,
                g: 0xbb,
                b: 0xcc
            }
        );
        // Untouched tokens inherit from the dark base.
        assert_eq!(
            custom_theme.color(ThemeToken::Prompt),
            Theme::dark().color(ThemeToken::Prompt)
        );
    }

    #[test]
    fn override_of_builtin_keeps_its_base() {
        let mut overrides = BTreeMap::new();
        let mut light = BTreeMap::new();
        light.insert("prompt".to_string(), "red".to_string());
        overrides.insert("Light".to_string(), light);
        let registry = ThemeRegistry::from_overrides(&overrides).expect("registry");
        let theme = registry.get("light").expect("light");
        assert_eq!(theme.color(ThemeToken::Prompt), Color::Red);
        assert_eq!(
            theme.color(ThemeToken::Response),
            Theme::light().color(ThemeToken::Response)
        );
    }

    #[test]
    fn invalid_override_color_is_rejected() {
        let mut overrides = BTreeMap::new();
        let mut custom = BTreeMap::new();
        custom.insert("error".to_string(), "#zz0000".to_string());
        overrides.insert("broken".to_string(), custom);
        let err = ThemeRegistry::from_overrides(&overrides).expect_err("must reject");
        assert!(err.contains("broken"));
    }

    #[test]
    fn select_rejects_unknown_name() {
        let registry = ThemeRegistry::from_overrides(&BTreeMap::new()).expect("registry");
        let err = registry.select("missing").expect_err("must reject");
        assert!(err.contains("unknown theme"));
        assert_eq!(registry.select(" DARK ").expect("dark").name, "dark");
    }

    #[test]
    fn parse_color_supports_hex_index_and_names() {
        assert_eq!(
            parse_color("#010203").expect("hex"),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
        assert_eq!(parse_color("240").expect("index"), Color::AnsiValue(240));
        assert_eq!(parse_color("yellow").expect("named"), Color::Yellow);
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("").is_err());
    }

    #[test]
    fn every_token_has_a_unique_key() {
        let mut keys: Vec<_> = ThemeToken::all().iter().map(|t| t.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), ThemeToken::all().len());
    }
}
