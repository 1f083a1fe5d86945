// Subtitle translation
//
// One chat-completion request per target language. The model is asked, in
// prose, to keep timestamps and cue layout intact; whether it did is checked
// by the pipeline, not here.

pub mod openai;
pub mod prompt;

use async_trait::async_trait;

use crate::config::{ApiConfig, TranslateConfig};
use crate::error::Result;
use crate::subtitle::SubtitleDocument;

/// Main trait for translation operations
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a subtitle document into `target_language` (a human-readable
    /// language name such as "French").
    async fn translate(&self, document: &SubtitleDocument, target_language: &str) -> Result<SubtitleDocument>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the OpenAI-compatible translator
    pub fn create_default(api: &ApiConfig, config: TranslateConfig) -> Result<Box<dyn Translator>> {
        Ok(Box::new(openai::OpenAiTranslator::new(api, config)?))
    }
}
