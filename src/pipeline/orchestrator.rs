use futures::stream::{self, StreamExt};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::config::{Config, DriftPolicy, FailurePolicy, PipelineConfig};
use crate::error::{Result, VidlingoError};
use crate::language::{Language, LanguageSelection};
use crate::media::{AudioExtractor, MediaProcessorFactory};
use crate::scratch::{ScratchKind, ScratchManager};
use crate::store::{FailedLanguage, ResultStore, TranslatedDocument};
use crate::subtitle::{SubtitleDocument, structural_mismatch};
use crate::transcribe::{Transcriber, TranscriberFactory};
use crate::translate::{Translator, TranslatorFactory};
use super::state::{PipelineState, ProgressObserver};
use super::video::UploadedVideo;

/// Policies applied by the orchestrator
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub failure_policy: FailurePolicy,
    pub drift_policy: DriftPolicy,
    pub max_concurrent_translations: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for PipelineOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            failure_policy: config.failure_policy,
            drift_policy: config.drift_policy,
            max_concurrent_translations: config.max_concurrent_translations,
        }
    }
}

/// What a completed run handed to the result store
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub translated: Vec<String>,
    pub failed: Vec<FailedLanguage>,
}

/// Translations collected for one transcript
#[derive(Debug, Clone, Default)]
pub struct TranslationOutcome {
    pub translations: Vec<TranslatedDocument>,
    pub failed: Vec<FailedLanguage>,
}

pub struct Pipeline {
    extractor: Box<dyn AudioExtractor>,
    transcriber: Box<dyn Transcriber>,
    translator: Box<dyn Translator>,
    scratch: ScratchManager,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        extractor: Box<dyn AudioExtractor>,
        transcriber: Box<dyn Transcriber>,
        translator: Box<dyn Translator>,
        scratch: ScratchManager,
        options: PipelineOptions,
    ) -> Self {
        Self {
            extractor,
            transcriber,
            translator,
            scratch,
            options,
        }
    }

    /// Build the pipeline with the ffmpeg extractor and the OpenAI adapters.
    pub fn from_config(config: &Config) -> Result<Self> {
        let extractor = MediaProcessorFactory::create_processor(config.media.clone());
        let transcriber = TranscriberFactory::create_default(&config.api, config.transcriber.clone())?;
        let translator = TranslatorFactory::create_default(&config.api, config.translate.clone())?;

        Ok(Self::new(
            extractor,
            transcriber,
            translator,
            ScratchManager::from_config(&config.pipeline),
            PipelineOptions::from(&config.pipeline),
        ))
    }

    pub fn check_dependencies(&self) -> Result<()> {
        self.extractor.check_availability()
    }

    pub fn scratch(&self) -> &ScratchManager {
        &self.scratch
    }

    pub fn transcriber(&self) -> &dyn Transcriber {
        self.transcriber.as_ref()
    }

    /// Run video → audio → transcript → translations and hand the output to
    /// `store`.
    ///
    /// Scratch files are released before this returns, whatever the outcome.
    /// On failure `store` is left as it was.
    pub async fn run(
        &self,
        video: UploadedVideo,
        languages: &LanguageSelection,
        observer: &dyn ProgressObserver,
        store: &mut ResultStore,
    ) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id);

        async {
            observer.on_transition(&PipelineState::Idle);
            info!(
                "Starting run: {} byte .{} video, {} language(s)",
                video.len(),
                video.extension(),
                languages.len()
            );

            match self.execute(&video, languages, observer).await {
                Ok((transcript, outcome)) => {
                    let translated = outcome
                        .translations
                        .iter()
                        .map(|t| t.language.name().to_string())
                        .collect();
                    let failed = outcome.failed.clone();

                    store.store(run_id, transcript, outcome.translations, outcome.failed);
                    observer.on_transition(&PipelineState::Completed);
                    info!("Run completed");

                    Ok(RunSummary {
                        run_id,
                        translated,
                        failed,
                    })
                }
                Err(e) => {
                    error!("Run failed: {}", e);
                    observer.on_transition(&PipelineState::Failed {
                        reason: e.user_message(),
                    });
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        video: &UploadedVideo,
        languages: &LanguageSelection,
        observer: &dyn ProgressObserver,
    ) -> Result<(SubtitleDocument, TranslationOutcome)> {
        video.validate()?;
        if languages.is_empty() {
            return Err(VidlingoError::Validation("Please select at least one language".to_string()));
        }

        // Both guards release on every early return below
        let video_file = self.scratch.acquire(ScratchKind::Video, &video.suffix())?;
        tokio::fs::write(video_file.path(), video.bytes()).await?;
        observer.on_transition(&PipelineState::VideoSaved);

        let format = self.extractor.output_format();
        let audio_file = self.scratch.acquire(ScratchKind::Audio, format.suffix)?;
        self.extractor
            .extract_audio(video_file.path(), audio_file.path())
            .await?;
        observer.on_transition(&PipelineState::AudioExtracted);

        let transcript = self.transcriber.transcribe(audio_file.path()).await?;
        observer.on_transition(&PipelineState::Transcribed);

        // Translation only needs the transcript
        video_file.release();
        audio_file.release();

        let outcome = self.translate_all(&transcript, languages, observer).await?;
        Ok((transcript, outcome))
    }

    /// Translate `transcript` into every selected language.
    ///
    /// Up to `max_concurrent_translations` requests run at once; results come
    /// back in selection order. Under [`FailurePolicy::AbortAll`] the first
    /// failure stops the phase and nothing is kept. Under
    /// [`FailurePolicy::BestEffort`] failures are collected, and the phase
    /// only fails when no language succeeded.
    pub async fn translate_all(
        &self,
        transcript: &SubtitleDocument,
        languages: &LanguageSelection,
        observer: &dyn ProgressObserver,
    ) -> Result<TranslationOutcome> {
        if languages.is_empty() {
            return Err(VidlingoError::Validation("Please select at least one language".to_string()));
        }

        let total = languages.len();
        let limit = self.options.max_concurrent_translations.max(1);

        let mut results = stream::iter(languages.iter().enumerate())
            .map(move |(i, language)| async move {
                observer.on_transition(&PipelineState::Translating {
                    current: i + 1,
                    total,
                    language: language.name().to_string(),
                });
                (language, self.translate_one(transcript, language).await)
            })
            .buffered(limit);

        let mut outcome = TranslationOutcome::default();
        let mut first_error = None;

        while let Some((language, result)) = results.next().await {
            match result {
                Ok(translated) => outcome.translations.push(translated),
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::AbortAll => return Err(e),
                    FailurePolicy::BestEffort => {
                        warn!("Skipping {}: {}", language.name(), e);
                        outcome.failed.push(FailedLanguage {
                            language: language.clone(),
                            message: e.to_string(),
                        });
                        first_error.get_or_insert(e);
                    }
                },
            }
        }

        match first_error {
            Some(e) if outcome.translations.is_empty() => Err(e),
            _ => Ok(outcome),
        }
    }

    async fn translate_one(&self, transcript: &SubtitleDocument, language: &Language) -> Result<TranslatedDocument> {
        let document = self.translator.translate(transcript, language.name()).await?;

        let drift = match self.options.drift_policy {
            DriftPolicy::Ignore => None,
            DriftPolicy::Warn | DriftPolicy::Reject => structural_mismatch(transcript, &document),
        };

        if let Some(detail) = &drift {
            if self.options.drift_policy == DriftPolicy::Reject {
                return Err(VidlingoError::StructuralDrift {
                    language: language.name().to_string(),
                    detail: detail.clone(),
                });
            }
            warn!("{} translation changed subtitle structure: {}", language.name(), detail);
        }

        Ok(TranslatedDocument {
            language: language.clone(),
            document,
            drift,
        })
    }
}
