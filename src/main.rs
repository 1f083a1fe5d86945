//! Vidlingo - Video Subtitle Transcription and Translation
//!
//! Command-line entry point: extracts audio with ffmpeg, transcribes it to
//! SRT and translates the subtitles into the selected languages.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use vidlingo::cli::{Args, Commands};
use vidlingo::config::Config;
use vidlingo::error::VidlingoError;
use vidlingo::language::LanguageSelection;
use vidlingo::pipeline::{LogProgress, PipelineState, ProgressObserver};
use vidlingo::workflow::{self, Workflow};

const DEFAULT_CONFIG_FILE: &str = "vidlingo.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Keep the guard alive so buffered log lines reach the file
    let guard = setup_logging(args.verbose)?;

    info!("Starting Vidlingo - Video Subtitle Transcription and Translation");

    let config = load_config(args.config.as_deref())?;

    if let Err(e) = run(args.command, config).await {
        error!("{}", e);
        eprintln!("{}", e.user_message());
        drop(guard);
        std::process::exit(1);
    }

    info!("Vidlingo completed successfully");
    Ok(())
}

async fn run(command: Commands, mut config: Config) -> vidlingo::error::Result<()> {
    match command {
        Commands::Process {
            input,
            languages,
            output_dir,
            failure_policy,
            drift_policy,
            concurrency,
            print,
        } => {
            if let Some(policy) = failure_policy {
                config.pipeline.failure_policy = policy.parse()?;
            }
            if let Some(policy) = drift_policy {
                config.pipeline.drift_policy = policy.parse()?;
            }
            if let Some(limit) = concurrency {
                config.pipeline.max_concurrent_translations = limit;
            }

            let selection = LanguageSelection::parse(&languages)?;
            let mut workflow = Workflow::new(&config)?;

            let spinner = SpinnerProgress::new();
            let result = workflow
                .process_file(&input, &selection, &output_dir, &spinner)
                .await;
            spinner.finish();
            let (summary, written) = result?;

            for path in &written {
                println!("{}", path.display());
            }
            for failed in &summary.failed {
                println!("Translation to {} failed: {}", failed.language.name(), failed.message);
            }

            if print {
                if let Some(results) = workflow.store().latest() {
                    println!("\nTranscription:\n{}", results.transcript.content);
                    for translation in &results.translations {
                        println!("\n{}:\n{}", translation.language, translation.artifact.content);
                    }
                }
            }
        }
        Commands::Extract { input, output } => {
            workflow::extract_audio(&config.media, &input, &output).await?;
            println!("{}", output.display());
        }
        Commands::Transcribe { input, output } => {
            let workflow = Workflow::new(&config)?;
            workflow.transcribe_audio(&input, &output).await?;
            println!("{}", output.display());
        }
        Commands::Translate {
            input,
            languages,
            output_dir,
        } => {
            let selection = LanguageSelection::parse(&languages)?;
            let workflow = Workflow::new(&config)?;

            let spinner = SpinnerProgress::new();
            let result = workflow
                .translate_subtitles(&input, &selection, &output_dir, &spinner)
                .await;
            spinner.finish();

            for path in result? {
                println!("{}", path.display());
            }
        }
        Commands::Languages => {
            println!("{:<12} {:<10}", "Label", "Name");
            println!("{}", "-".repeat(22));
            for language in vidlingo::language::catalog() {
                println!("{:<12} {:<10}", language.label(), language.name());
            }
        }
        Commands::InitConfig { path } => {
            if path.exists() {
                return Err(VidlingoError::Config(format!(
                    "Refusing to overwrite existing file: {}",
                    path.display()
                )));
            }
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// `--config` wins, then `./vidlingo.toml`, then built-in defaults.
fn load_config(explicit: Option<&Path>) -> vidlingo::error::Result<Config> {
    match explicit {
        Some(path) => Config::from_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
            Config::from_file(DEFAULT_CONFIG_FILE)
        }
        None => Ok(Config::default()),
    }
}

/// Renders pipeline markers on a terminal spinner
struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for SpinnerProgress {
    fn on_transition(&self, state: &PipelineState) {
        LogProgress.on_transition(state);
        if state.is_terminal() {
            self.bar.println(state.to_string());
        }
        self.bar.set_message(state.to_string());
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".vidlingo").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = rolling::daily(&log_dir, "vidlingo.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("vidlingo.log").display()
    );

    Ok(guard)
}
