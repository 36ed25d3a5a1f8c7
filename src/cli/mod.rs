//! CLI module for Vidask.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Vidask - Ask questions about video content
///
/// Ingests a video's transcript into a vector index and answers
/// natural-language questions about it with cited, sectioned answers.
#[derive(Parser, Debug)]
#[command(name = "vidask")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a video's transcript and index it for question answering
    Ingest {
        /// Video URL or bare video id
        input: String,
    },

    /// Ask a single question about an ingested video
    Ask {
        /// Video URL or bare video id
        #[arg(short = 'i', long)]
        video: String,

        /// The question to ask
        question: String,
    },

    /// Start an interactive question session about one video
    Chat {
        /// Video URL or bare video id
        #[arg(short = 'i', long)]
        video: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
