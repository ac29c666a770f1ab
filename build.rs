//! Stamps the termline binary with the commit and build time shown by
//! `termline --version`.
//!
//! Packagers can pin both values through `TERMLINE_BUILD_GIT_HASH` and
//! `TERMLINE_BUILD_TIMESTAMP`. Otherwise they come from `git` and `date`, with
//! "unknown" and a `unix:<secs>` stamp as the last resort.

use std::env;
use std::fs;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const HASH_VAR: &str = "TERMLINE_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "TERMLINE_BUILD_TIMESTAMP";

fn main() {
    watch_git_head();
    println!("cargo:rerun-if-env-changed={HASH_VAR}");
    println!("cargo:rerun-if-env-changed={TIMESTAMP_VAR}");

    let hash = env::var(HASH_VAR).unwrap_or_else(|_| commit_hash());
    let timestamp = env::var(TIMESTAMP_VAR).unwrap_or_else(|_| utc_timestamp());

    println!("cargo:rustc-env={HASH_VAR}={hash}");
    println!("cargo:rustc-env={TIMESTAMP_VAR}={timestamp}");
}

/// Rebuild when HEAD moves or the checked-out branch gets a new commit.
fn watch_git_head() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    let Ok(head) = fs::read_to_string(".git/HEAD") else {
        return;
    };
    if let Some(branch_ref) = head.trim().strip_prefix("ref: ") {
        println!("cargo:rerun-if-changed=.git/{branch_ref}");
    }
}

fn commit_hash() -> String {
    command_stdout("git", &["rev-parse", "--short=12", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string())
}

fn utc_timestamp() -> String {
    command_stdout("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]).unwrap_or_else(|| {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        format!("unix:{secs}")
    })
}

/// Trimmed stdout of a successful command, `None` on failure or empty output.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
