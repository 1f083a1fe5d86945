use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::config::{Config, MediaConfig};
use crate::error::{Result, VidlingoError};
use crate::language::{Language, LanguageSelection, catalog};
use crate::media::MediaProcessorFactory;
use crate::pipeline::{Pipeline, ProgressObserver, RunSummary, UploadedVideo};
use crate::store::{ResultStore, download_filename};
use crate::subtitle::SubtitleDocument;

pub struct Workflow {
    pipeline: Pipeline,
    store: ResultStore,
}

impl Workflow {
    pub fn new(config: &Config) -> Result<Self> {
        let pipeline = Pipeline::from_config(config)?;
        Ok(Self::with_pipeline(pipeline))
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            store: ResultStore::new(),
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Run the full pipeline for one video file and write every download
    /// into `output_dir`.
    pub async fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input_path: P,
        languages: &LanguageSelection,
        output_dir: Q,
        observer: &dyn ProgressObserver,
    ) -> Result<(RunSummary, Vec<PathBuf>)> {
        let input_path = input_path.as_ref();
        info!("Processing video file: {}", input_path.display());

        if !input_path.exists() {
            return Err(VidlingoError::Validation(format!(
                "Video file not found: {}",
                input_path.display()
            )));
        }

        self.pipeline.check_dependencies()?;

        let video = UploadedVideo::from_path(input_path).await?;
        let summary = self
            .pipeline
            .run(video, languages, observer, &mut self.store)
            .await?;

        for failed in &summary.failed {
            warn!("No translation for {}: {}", failed.language.name(), failed.message);
        }

        let written = match self.store.latest() {
            Some(results) => results.write_to_dir(output_dir).await?,
            None => Vec::new(),
        };

        Ok((summary, written))
    }

    /// Transcribe an audio file and write the SRT to `output_path`.
    pub async fn transcribe_audio<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        audio_path: P,
        output_path: Q,
    ) -> Result<SubtitleDocument> {
        let audio_path = audio_path.as_ref();
        let output_path = output_path.as_ref();
        info!("Transcribing audio: {}", audio_path.display());

        let transcript = self.pipeline.transcriber().transcribe(audio_path).await?;
        fs::write(output_path, transcript.as_str()).await?;
        info!("Transcript written to {}", output_path.display());

        Ok(transcript)
    }

    /// Translate an existing SRT file into every selected language.
    ///
    /// Uses the pipeline's failure and drift policies. Returns the paths of
    /// the files written.
    pub async fn translate_subtitles<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        languages: &LanguageSelection,
        output_dir: Q,
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<PathBuf>> {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();
        info!("Translating subtitles: {}", input_path.display());

        let transcript = SubtitleDocument::new(fs::read_to_string(input_path).await?);
        if transcript.is_empty() {
            return Err(VidlingoError::Validation(format!(
                "Subtitle file is empty: {}",
                input_path.display()
            )));
        }

        let outcome = self
            .pipeline
            .translate_all(&transcript, languages, observer)
            .await?;

        for failed in &outcome.failed {
            warn!("No translation for {}: {}", failed.language.name(), failed.message);
        }

        fs::create_dir_all(output_dir).await?;
        let now = Local::now();
        let mut written = Vec::with_capacity(outcome.translations.len());
        for translated in outcome.translations {
            let path = output_dir.join(download_filename(&translated.language.file_prefix(), now));
            fs::write(&path, translated.document.as_str()).await?;
            info!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Built-in languages offered for selection
    pub fn list_languages(&self) -> Vec<Language> {
        catalog()
    }
}

/// Extract the audio track of a video without setting up the API adapters.
pub async fn extract_audio<P: AsRef<Path>, Q: AsRef<Path>>(
    config: &MediaConfig,
    video_path: P,
    audio_path: Q,
) -> Result<()> {
    let video_path = video_path.as_ref();
    let audio_path = audio_path.as_ref();

    let extractor = MediaProcessorFactory::create_processor(config.clone());
    extractor.check_availability()?;

    info!("Extracting audio from: {}", video_path.display());
    extractor.extract_audio(video_path, audio_path).await?;
    info!("Audio written to {}", audio_path.display());

    Ok(())
}
