//! CLI argument parsing via clap.

use crate::build_info;
use clap::Parser;

/// Demo REPL for the termline editor. Echoes each submitted line.
#[derive(Debug, Parser)]
#[command(name = "termline", version, long_version = build_info::LONG_VERSION)]
pub struct Args {
    /// Path to config file (default: ./termline.toml or ~/.config/termline/termline.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the history file location.
    #[arg(long = "history-file", value_name = "PATH")]
    pub history_file: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Override the primary prompt.
    #[arg(short = 'p', long = "prompt")]
    pub prompt: Option<String>,
}
