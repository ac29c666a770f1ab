//! Compile-time build metadata for `--version` and the demo banner.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("TERMLINE_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("TERMLINE_BUILD_TIMESTAMP");

/// Version block shown by `termline --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("TERMLINE_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("TERMLINE_BUILD_TIMESTAMP")
);

/// Render concise startup metadata shown in the demo banner.
pub fn startup_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_metadata_line_contains_all_fields() {
        let text = startup_metadata_line();
        assert!(text.starts_with('v'));
        assert!(text.contains(GIT_COMMIT));
        assert!(text.contains(BUILD_TIMESTAMP));
    }

    #[test]
    fn long_version_lists_commit_and_build_time() {
        assert!(LONG_VERSION.starts_with(VERSION));
        assert!(LONG_VERSION.contains("commit:"));
        assert!(LONG_VERSION.contains("built:"));
    }
}
