use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{ApiConfig, TranscriberConfig};
use crate::error::{Result, VidlingoError};
use crate::subtitle::SubtitleDocument;
use super::Transcriber;

/// Transcriber speaking the OpenAI `audio/transcriptions` API
pub struct OpenAiTranscriber {
    client: Client,
    url: String,
    api_key: String,
    config: TranscriberConfig,
}

impl OpenAiTranscriber {
    pub fn new(api: &ApiConfig, config: TranscriberConfig) -> Result<Self> {
        let api_key = api.api_key()?;
        Self::with_api_key(api, config, api_key)
    }

    pub fn with_api_key(api: &ApiConfig, config: TranscriberConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: api.endpoint("audio/transcriptions"),
            api_key,
            config,
        })
    }

    async fn build_form(&self, audio_path: &Path) -> Result<Form> {
        let audio = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.mp3".to_string());

        let part = Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/mpeg")?;

        Ok(Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("response_format", "srt"))
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<SubtitleDocument> {
        info!("Transcribing {} with {}", audio_path.display(), self.config.model);

        let form = self.build_form(audio_path).await?;

        debug!("Sending transcription request to: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VidlingoError::Transcription(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VidlingoError::Transcription(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| VidlingoError::Transcription(format!("Failed to read response: {}", e)))?;

        if transcript.trim().is_empty() {
            return Err(VidlingoError::Transcription("Empty transcript received".to_string()));
        }

        info!("Transcription completed: {} characters", transcript.len());
        Ok(SubtitleDocument::new(transcript))
    }
}
