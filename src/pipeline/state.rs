use std::fmt;
use tracing::info;

/// States of one pipeline run.
///
/// ```text
/// Idle ──▶ VideoSaved ──▶ AudioExtracted ──▶ Transcribed ──▶ Translating(i/N) ──▶ Completed
///   └──────────┴───────────────┴──────────────────┴────────────────┴──▶ Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    VideoSaved,
    AudioExtracted,
    Transcribed,
    /// The `current`-th of `total` translations has started
    Translating {
        current: usize,
        total: usize,
        language: String,
    },
    Completed,
    Failed {
        reason: String,
    },
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Waiting for input"),
            Self::VideoSaved => write!(f, "1. Video uploaded"),
            Self::AudioExtracted => write!(f, "2. Video converted to audio (ffmpeg)"),
            Self::Transcribed => write!(f, "3. Audio transcribed to subtitles"),
            Self::Translating {
                current,
                total,
                language,
            } => write!(f, "4. Translating ({}/{}): {}", current, total, language),
            Self::Completed => write!(f, "Processing complete"),
            Self::Failed { reason } => write!(f, "Processing failed: {}", reason),
        }
    }
}

/// Receives a marker on every state change. Purely observational.
pub trait ProgressObserver: Send + Sync {
    fn on_transition(&self, state: &PipelineState);
}

/// Observer that writes markers to the log
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_transition(&self, state: &PipelineState) {
        info!("{}", state);
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(&PipelineState) + Send + Sync,
{
    fn on_transition(&self, state: &PipelineState) {
        self(state)
    }
}
