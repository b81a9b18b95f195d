use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (default: `$XDG_CONFIG_HOME/swipenav/config.kdl`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Sub,
}

#[derive(Subcommand)]
pub enum Sub {
    /// Replay a recorded pointer trace and print the recognized gestures as JSON lines.
    Replay {
        /// JSON array of trace events.
        trace: PathBuf,
    },
    /// Validate the config file.
    Validate,
}
