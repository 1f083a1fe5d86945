use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcribe a video and translate the subtitles
    Process {
        /// Input video file (mp4, mov, avi, mkv)
        #[arg(short, long)]
        input: PathBuf,

        /// Target languages (comma-separated labels or names)
        #[arg(short, long)]
        languages: String,

        /// Output directory for the .srt downloads
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// What to do when one language fails (abort-all, best-effort)
        #[arg(long)]
        failure_policy: Option<String>,

        /// What to do when a translation changes subtitle structure (reject, warn, ignore)
        #[arg(long)]
        drift_policy: Option<String>,

        /// Number of translations allowed in flight at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print the transcript and translations after writing them
        #[arg(long)]
        print: bool,
    },

    /// Extract audio from a video file
    Extract {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Transcribe an audio file to SRT subtitles
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Translate an SRT file
    Translate {
        /// Input subtitle file
        #[arg(short, long)]
        input: PathBuf,

        /// Target languages (comma-separated labels or names)
        #[arg(short, long)]
        languages: String,

        /// Output directory for the translated files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// List the built-in languages
    Languages,

    /// Write the default configuration as TOML
    InitConfig {
        /// Destination file
        #[arg(short, long, default_value = "vidlingo.toml")]
        path: PathBuf,
    },
}
