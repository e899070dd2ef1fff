use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kanju", version, about, long_about = None)]
pub struct Cli {
    /// config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// directory holding the watch history
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a video page URL and record it in history
    Play {
        url: String,
        #[command(flatten)]
        line: LineArgs,
    },
    /// Play a history entry again
    Replay {
        index: usize,
        #[command(flatten)]
        line: LineArgs,
    },
    /// Show the title and episode guessed from a URL
    Info { url: String },
    /// List watch history
    History {
        /// print the stored JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Attach a note to a history entry
    Note { index: usize, text: String },
    /// Remove all history entries
    Clear {
        /// skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List configured parse lines
    Lines,
}

#[derive(Args, Debug, Default, Clone)]
pub struct LineArgs {
    /// parse line name from the config
    #[arg(long, conflicts_with = "api")]
    pub line: Option<String>,
    /// ad-hoc parse line URL template (video URL is appended)
    #[arg(long)]
    pub api: Option<String>,
    /// open the player page in the system browser
    #[arg(long)]
    pub open: bool,
}
