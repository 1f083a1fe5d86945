use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{ApiConfig, TranslateConfig};
use crate::error::{Result, VidlingoError};
use crate::subtitle::SubtitleDocument;
use super::Translator;
use super::prompt::{ChatMessage, build_messages};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice with surrounding whitespace removed
    pub fn first_content(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|content| content.trim().to_string())
    }
}

/// Translator speaking the OpenAI `chat/completions` API
pub struct OpenAiTranslator {
    client: Client,
    url: String,
    api_key: String,
    config: TranslateConfig,
}

impl OpenAiTranslator {
    pub fn new(api: &ApiConfig, config: TranslateConfig) -> Result<Self> {
        let api_key = api.api_key()?;
        Self::with_api_key(api, config, api_key)
    }

    pub fn with_api_key(api: &ApiConfig, config: TranslateConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: api.endpoint("chat/completions"),
            api_key,
            config,
        })
    }

    pub fn build_request(&self, document: &SubtitleDocument, target_language: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: build_messages(document.as_str(), target_language),
        }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, document: &SubtitleDocument, target_language: &str) -> Result<SubtitleDocument> {
        info!("Translating subtitles to {} with {}", target_language, self.config.model);

        let failure = |message: String| VidlingoError::Translation {
            language: target_language.to_string(),
            message,
        };

        let request = self.build_request(document, target_language);

        debug!("Sending translation request to: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| failure(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(failure(format!("API error {}: {}", status, error_text)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| failure(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .first_content()
            .ok_or_else(|| failure("Response contained no message content".to_string()))?;

        debug!("Received {} characters of {} subtitles", content.len(), target_language);
        Ok(SubtitleDocument::new(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_model_and_messages() {
        let translator = OpenAiTranslator::with_api_key(
            &ApiConfig::default(),
            TranslateConfig::default(),
            "sk-test".to_string(),
        )
        .unwrap();

        let request = translator.build_request(&SubtitleDocument::new("1\n"), "Turkish");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json["messages"][1]["content"].as_str().unwrap().contains("to Turkish?"));
        assert_eq!(translator.url, "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn first_content_is_trimmed() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"\n1\n00:00:00,000 --> 00:00:01,000\nSalut\n\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.first_content().unwrap(),
            "1\n00:00:00,000 --> 00:00:01,000\nSalut"
        );
    }

    #[test]
    fn missing_content_yields_none() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
        assert_eq!(response.first_content(), None);

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.first_content(), None);
    }
}
