//! Results of the most recent completed run.
//!
//! A [`ResultStore`] is owned by whoever drives the pipeline (the CLI
//! workflow, a test). Each completed run replaces its contents; failed runs
//! leave it untouched.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::language::Language;
use crate::subtitle::SubtitleDocument;

/// MIME type offered for every download
pub const SUBTITLE_MIME: &str = "text/plain";

/// Prefix of the transcript download
pub const TRANSCRIPT_PREFIX: &str = "transcription";

/// `{prefix}_{YYYYMMDD_HHMMSS}.srt`
pub fn download_filename(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.srt", prefix, at.format("%Y%m%d_%H%M%S"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub content: SubtitleDocument,
    pub filename: String,
}

impl StoredArtifact {
    pub fn mime(&self) -> &'static str {
        SUBTITLE_MIME
    }
}

#[derive(Debug, Clone)]
pub struct StoredTranslation {
    pub language: Language,
    pub artifact: StoredArtifact,
    /// Structural mismatch noticed but tolerated under the drift policy
    pub drift: Option<String>,
}

/// A language whose translation failed in a best-effort run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedLanguage {
    pub language: Language,
    pub message: String,
}

/// Output of one completed run, ready for display and download.
#[derive(Debug, Clone)]
pub struct SessionResults {
    pub run_id: Uuid,
    pub written_at: DateTime<Local>,
    pub transcript: StoredArtifact,
    pub translations: Vec<StoredTranslation>,
    pub failed: Vec<FailedLanguage>,
}

impl SessionResults {
    /// Translation keyed by language name
    pub fn translation(&self, name: &str) -> Option<&StoredTranslation> {
        self.translations.iter().find(|t| t.language.name() == name)
    }

    /// Write every artifact under its download name into `dir`.
    pub async fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;

        let artifacts = std::iter::once(&self.transcript)
            .chain(self.translations.iter().map(|t| &t.artifact));

        let mut written = Vec::new();
        for artifact in artifacts {
            let path = dir.join(&artifact.filename);
            fs::write(&path, artifact.content.as_str()).await?;
            info!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

/// Translation handed over by the pipeline, before naming
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    pub language: Language,
    pub document: SubtitleDocument,
    pub drift: Option<String>,
}

#[derive(Debug, Default)]
pub struct ResultStore {
    latest: Option<SessionResults>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored results, naming downloads after the current time.
    pub fn store(
        &mut self,
        run_id: Uuid,
        transcript: SubtitleDocument,
        translations: Vec<TranslatedDocument>,
        failed: Vec<FailedLanguage>,
    ) -> &SessionResults {
        self.store_at(run_id, transcript, translations, failed, Local::now())
    }

    pub fn store_at(
        &mut self,
        run_id: Uuid,
        transcript: SubtitleDocument,
        translations: Vec<TranslatedDocument>,
        failed: Vec<FailedLanguage>,
        at: DateTime<Local>,
    ) -> &SessionResults {
        let transcript = StoredArtifact {
            content: transcript,
            filename: download_filename(TRANSCRIPT_PREFIX, at),
        };

        let translations = translations
            .into_iter()
            .map(|t| StoredTranslation {
                artifact: StoredArtifact {
                    content: t.document,
                    filename: download_filename(&t.language.file_prefix(), at),
                },
                language: t.language,
                drift: t.drift,
            })
            .collect();

        self.latest.insert(SessionResults {
            run_id,
            written_at: at,
            transcript,
            translations,
            failed,
        })
    }

    pub fn latest(&self) -> Option<&SessionResults> {
        self.latest.as_ref()
    }

    pub fn transcript(&self) -> Option<&StoredArtifact> {
        self.latest.as_ref().map(|results| &results.transcript)
    }

    pub fn translation(&self, name: &str) -> Option<&StoredTranslation> {
        self.latest.as_ref().and_then(|results| results.translation(name))
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}
