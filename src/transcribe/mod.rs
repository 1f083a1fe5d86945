// Speech-to-text
//
// Transcription is delegated to a remote service that returns SRT directly;
// nothing here segments or timestamps audio.

pub mod openai;

use async_trait::async_trait;
use std::path::Path;

use crate::config::{ApiConfig, TranscriberConfig};
use crate::error::Result;
use crate::subtitle::SubtitleDocument;

/// Main trait for transcription operations
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into subtitle text
    async fn transcribe(&self, audio_path: &Path) -> Result<SubtitleDocument>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the OpenAI-compatible transcriber
    pub fn create_default(api: &ApiConfig, config: TranscriberConfig) -> Result<Box<dyn Transcriber>> {
        Ok(Box::new(openai::OpenAiTranscriber::new(api, config)?))
    }
}
